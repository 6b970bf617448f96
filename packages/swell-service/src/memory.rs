use std::collections::{BTreeMap, BTreeSet};

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{BoxFuture, CatalogStore, Error, InteractionStore, Result, UserStore};
use swell_domain::{ActionType, Coordi, Gender, Hashtag, Interaction, UserProfile};

/// In-process catalog, interaction and user store.
///
/// Mirrors the Postgres semantics: likes are unique per (user, outfit) and promote an earlier
/// skip or preference, view logs are append-only and `like_count` is derived from active likes.
#[derive(Default)]
pub struct MemoryStore {
	state: RwLock<State>,
}

#[derive(Default)]
struct State {
	coordis: BTreeMap<i64, Coordi>,
	hashtags: BTreeMap<i64, Hashtag>,
	users: BTreeMap<i64, UserProfile>,
	onboarded: BTreeSet<i64>,
	preferred_hashtags: BTreeMap<i64, Vec<i64>>,
	interactions: Vec<Interaction>,
}
impl State {
	fn with_like_count(&self, coordi: &Coordi) -> Coordi {
		let likes = self
			.interactions
			.iter()
			.filter(|row| row.coordi_id == coordi.coordi_id && row.action == ActionType::Like)
			.count();
		let mut out = coordi.clone();

		out.like_count = coordi.like_count + likes as i64;

		out
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn insert_coordi(&self, coordi: Coordi) {
		self.state.write().await.coordis.insert(coordi.coordi_id, coordi);
	}

	pub async fn insert_hashtag(&self, hashtag: Hashtag) {
		self.state.write().await.hashtags.insert(hashtag.hashtag_id, hashtag);
	}

	pub async fn insert_user(&self, user: UserProfile) {
		self.state.write().await.users.insert(user.user_id, user);
	}

	pub async fn set_preferred_hashtags(&self, user_id: i64, hashtag_ids: Vec<i64>) {
		self.state.write().await.preferred_hashtags.insert(user_id, hashtag_ids);
	}

	pub async fn has_completed_onboarding(&self, user_id: i64) -> bool {
		self.state.read().await.onboarded.contains(&user_id)
	}

	/// Appends a raw interaction without the like uniqueness check.
	pub async fn record(&self, interaction: Interaction) {
		self.state.write().await.interactions.push(interaction);
	}
}

impl CatalogStore for MemoryStore {
	fn list_coordis<'a>(&'a self, gender: Option<Gender>) -> BoxFuture<'a, Result<Vec<Coordi>>> {
		Box::pin(async move {
			let state = self.state.read().await;

			Ok(state
				.coordis
				.values()
				.filter(|coordi| coordi.gender.admitted_by(gender))
				.map(|coordi| state.with_like_count(coordi))
				.collect())
		})
	}

	fn get_coordis<'a>(&'a self, coordi_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<Coordi>>> {
		Box::pin(async move {
			let state = self.state.read().await;

			Ok(state
				.coordis
				.values()
				.filter(|coordi| coordi_ids.contains(&coordi.coordi_id))
				.map(|coordi| state.with_like_count(coordi))
				.collect())
		})
	}

	fn list_hashtags<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Hashtag>>> {
		Box::pin(async move { Ok(self.state.read().await.hashtags.values().cloned().collect()) })
	}
}

impl InteractionStore for MemoryStore {
	fn list_interactions<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<Interaction>>> {
		Box::pin(async move {
			let state = self.state.read().await;

			Ok(state.interactions.iter().filter(|row| row.user_id == user_id).cloned().collect())
		})
	}

	fn preferred_hashtag_ids<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Vec<i64>>> {
		Box::pin(async move {
			let state = self.state.read().await;

			Ok(state.preferred_hashtags.get(&user_id).cloned().unwrap_or_default())
		})
	}

	fn insert_like<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move {
			let mut guard = self.state.write().await;
			let state = &mut *guard;

			if !state.coordis.contains_key(&coordi_id) {
				return Err(unknown_coordi(coordi_id));
			}

			let same_pair =
				|row: &Interaction| row.user_id == user_id && row.coordi_id == coordi_id;
			let liked = |row: &Interaction| same_pair(row) && row.action == ActionType::Like;

			if state.interactions.iter().any(liked) {
				return Err(Error::Conflict {
					message: format!("Coordi {coordi_id} is already liked."),
				});
			}

			let now = OffsetDateTime::now_utc();
			let promoted = state.interactions.iter_mut().find(|row| {
				same_pair(row) && matches!(row.action, ActionType::Skip | ActionType::Preference)
			});

			match promoted {
				Some(row) => {
					row.action = ActionType::Like;
					row.interacted_at = now;
				},
				None => state.interactions.push(Interaction {
					user_id,
					coordi_id,
					action: ActionType::Like,
					interacted_at: now,
					duration_seconds: None,
				}),
			}

			Ok(now)
		})
	}

	fn insert_view<'a>(
		&'a self,
		user_id: i64,
		coordi_id: i64,
		duration_seconds: i32,
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move {
			if duration_seconds < 0 {
				return Err(Error::InvalidRequest {
					message: "duration_seconds must be zero or greater.".to_string(),
				});
			}

			let mut state = self.state.write().await;

			if !state.coordis.contains_key(&coordi_id) {
				return Err(unknown_coordi(coordi_id));
			}

			let now = OffsetDateTime::now_utc();

			state.interactions.push(Interaction {
				user_id,
				coordi_id,
				action: ActionType::View,
				interacted_at: now,
				duration_seconds: Some(duration_seconds),
			});

			Ok(now)
		})
	}

	fn replace_preferences<'a>(
		&'a self,
		user_id: i64,
		hashtag_ids: &'a [i64],
		sample_coordi_ids: &'a [i64],
	) -> BoxFuture<'a, Result<OffsetDateTime>> {
		Box::pin(async move {
			let mut guard = self.state.write().await;
			let state = &mut *guard;

			if !state.users.contains_key(&user_id) {
				return Err(Error::NotFound { message: format!("User {user_id} does not exist.") });
			}
			if let Some(id) = hashtag_ids.iter().find(|id| !state.hashtags.contains_key(id)) {
				return Err(Error::InvalidRequest { message: format!("Unknown hashtag id {id}.") });
			}
			if let Some(id) = sample_coordi_ids.iter().find(|id| !state.coordis.contains_key(id)) {
				return Err(Error::InvalidRequest { message: format!("Unknown coordi id {id}.") });
			}

			let now = OffsetDateTime::now_utc();
			let hashtags: BTreeSet<i64> = hashtag_ids.iter().copied().collect();

			state.preferred_hashtags.insert(user_id, hashtags.into_iter().collect());
			state
				.interactions
				.retain(|row| !(row.user_id == user_id && row.action == ActionType::Preference));

			let samples: BTreeSet<i64> = sample_coordi_ids.iter().copied().collect();

			for coordi_id in samples {
				let decided = state.interactions.iter().any(|row| {
					row.user_id == user_id
						&& row.coordi_id == coordi_id
						&& matches!(row.action, ActionType::Like | ActionType::Skip)
				});

				if !decided {
					state.interactions.push(Interaction {
						user_id,
						coordi_id,
						action: ActionType::Preference,
						interacted_at: now,
						duration_seconds: None,
					});
				}
			}

			state.onboarded.insert(user_id);

			Ok(now)
		})
	}
}

impl UserStore for MemoryStore {
	fn find_user<'a>(&'a self, user_id: i64) -> BoxFuture<'a, Result<Option<UserProfile>>> {
		Box::pin(async move { Ok(self.state.read().await.users.get(&user_id).cloned()) })
	}
}

fn unknown_coordi(coordi_id: i64) -> Error {
	Error::NotFound { message: format!("Coordi {coordi_id} does not exist.") }
}
