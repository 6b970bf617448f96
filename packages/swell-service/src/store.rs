use time::OffsetDateTime;

use crate::{BoxFuture, Error, Result};
use swell_domain::{ActionType, Coordi, Gender, Hashtag, Interaction, UserProfile};
use swell_storage::{
	db::Db,
	models::{CoordiRow, HashtagRow, InteractionRow, UserRow},
	queries,
};

pub trait CatalogStore
where
	Self: Send + Sync,
{
	/// Lists outfits admitted by `gender` (unisex always included), ordered by id.
	fn list_coordis<'a>(&'a self, gender: Option<Gender>) -> BoxFuture<'a, Result<Vec<Coordi>>>;

	/// Fetches the given outfits. Unknown ids are silently absent.
	fn get_coordis<'a>(&'a self, coordi_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Coordi>>>;

	/// Lists every hashtag, ordered by id.
	fn list_hashtags<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Hashtag>>>;
}

pub trait InteractionStore
where
	Self: Send + Sync,
{
	fn list_interactions<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<Interaction>>>;

	fn preferred_hashtag_ids<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<i64>>>;

	/// Records a like; a second like on the same outfit is a [`Error::Conflict`].
	fn insert_like<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
	) -> BoxFuture<'a, Result<OffsetDateTime>>;

	/// Appends a view log entry.
	fn insert_view<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
		duration_seconds: i32,
	) -> BoxFuture<'a, Result<OffsetDateTime>>;

	/// Replaces the user's hashtag preferences and sample-outfit `preference` interactions.
	fn replace_preferences<'a>(
		&'a self,
		user_id: i64,
		hashtag_ids: &'a [i64],
		sample_coordi_ids: &'a [i64],
	) -> BoxFuture<'a, Result<OffsetDateTime>>;
}

pub trait UserStore
where
	Self: Send + Sync,
{
	fn find_user<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Option<UserProfile>>>;
}

impl CatalogStore for Db {
	fn list_coordis<'a>(&'a self, gender: Option<Gender>) -> BoxFuture<'a, Result<Vec<Coordi>>> {
		Box::pin(async move {
			let rows = queries::list_coordis(self, gender.map(Gender::as_str)).await?;

			rows.into_iter().map(coordi_from_row).collect()
		})
	}

	fn get_coordis<'a>(&'a self, coordi_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Coordi>>> {
		Box::pin(async move {
			let rows = queries::get_coordis(self, coordi_ids).await?;

			rows.into_iter().map(coordi_from_row).collect()
		})
	}

	fn list_hashtags<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Hashtag>>> {
		Box::pin(async move {
			let rows = queries::list_hashtags(self).await?;

			Ok(rows.into_iter().map(hashtag_from_row).collect())
		})
	}
}

impl InteractionStore for Db {
	fn list_interactions<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<Interaction>>> {
		Box::pin(async move {
			let rows = queries::list_interactions(self, user_id).await?;

			rows.into_iter().map(interaction_from_row).collect()
		})
	}

	fn preferred_hashtag_ids<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<i64>>> {
		Box::pin(async move { Ok(queries::list_preferred_hashtags(self, user_id).await?) })
	}

	fn insert_like<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move { Ok(queries::insert_like(self, user_id, coordi_id).await?) })
	}

	fn insert_view<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
		duration_seconds: i32,
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move {
			Ok(queries::insert_view_log(self, user_id, coordi_id, duration_seconds).await?)
		})
	}

	fn replace_preferences<'a>(
		&'a self,
		user_id: i64,
		hashtag_ids: &'a [i64],
		sample_coordi_ids: &'a [i64],
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move {
			Ok(queries::replace_preferences(self, user_id, hashtag_ids, sample_coordi_ids).await?)
		})
	}
}

impl UserStore for Db {
	fn find_user<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Option<UserProfile>>> {
		Box::pin(async move {
			let row = queries::find_user(self, user_id).await?;

			Ok(row.map(user_from_row))
		})
	}
}

fn coordi_from_row(row: CoordiRow) -> Result<Coordi> {
	let gender = Gender::parse(&row.gender).ok_or_else(|| Error::Storage {
		message: format!("Coordi {} has unknown gender {:?}.", row.coordi_id, row.gender),
	})?;

	Ok(Coordi {
		coordi_id: row.coordi_id,
		description: row.description,
		gender,
		hashtag_ids: row.hashtag_ids,
		image_urls: row.image_urls,
		like_count: row.like_count,
		created_at: row.created_at,
	})
}

fn interaction_from_row(row: InteractionRow) -> Result<Interaction> {
	let action = ActionType::parse(&row.action_type).ok_or_else(|| Error::Storage {
		message: format!("Interaction has unknown action type {:?}.", row.action_type),
	})?;

	Ok(Interaction {
		user_id: row.user_id,
		coordi_id: row.coordi_id,
		action,
		interacted_at: row.interacted_at,
		duration_seconds: row.duration_seconds,
	})
}

fn user_from_row(row: UserRow) -> UserProfile {
	UserProfile { user_id: row.user_id, gender: row.gender }
}

fn hashtag_from_row(row: HashtagRow) -> Hashtag {
	Hashtag { hashtag_id: row.hashtag_id, name: row.name }
}
