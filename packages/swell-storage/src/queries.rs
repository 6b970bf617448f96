use sqlx::{PgConnection, PgExecutor};
use time::OffsetDateTime;

use crate::{
	Error, Result,
	db::Db,
	models::{CoordiRow, HashtagRow, InteractionRow, UserRow},
};

const COORDI_SELECT: &str = "\
SELECT
	c.coordi_id,
	c.description,
	c.gender,
	COALESCE(
		(SELECT array_agg(h.hashtag_id ORDER BY h.hashtag_id)
		FROM coordi_hashtags h
		WHERE h.coordi_id = c.coordi_id),
		'{}'::bigint[]
	) AS hashtag_ids,
	COALESCE(
		(SELECT array_agg(i.image_url ORDER BY i.sort_order, i.image_url)
		FROM coordi_images i
		WHERE i.coordi_id = c.coordi_id),
		'{}'::text[]
	) AS image_urls,
	(SELECT count(*)
	FROM user_coordi_interactions x
	WHERE x.coordi_id = c.coordi_id AND x.action_type = 'like') AS like_count,
	c.created_at
FROM coordis c";

/// Lists the catalog, restricted to `gender` plus unisex outfits when a gender is given.
pub async fn list_coordis(db: &Db, gender: Option<&str>) -> Result<Vec<CoordiRow>> {
	let sql = format!(
		"{COORDI_SELECT}
WHERE $1::text IS NULL OR c.gender = $1 OR c.gender = 'unisex'
ORDER BY c.coordi_id"
	);
	let rows = sqlx::query_as::<_, CoordiRow>(&sql).bind(gender).fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Fetches the given outfits. Unknown ids are absent from the result.
pub async fn get_coordis(db: &Db, coordi_ids: &[i64]) -> Result<Vec<CoordiRow>> {
	if coordi_ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"{COORDI_SELECT}
WHERE c.coordi_id = ANY($1)
ORDER BY c.coordi_id"
	);
	let rows = sqlx::query_as::<_, CoordiRow>(&sql).bind(coordi_ids).fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn coordi_exists<'e, E>(executor: E, coordi_id: i64) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM coordis WHERE coordi_id = $1)")
			.bind(coordi_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}

/// Returns explicit interactions and view logs for a user, oldest first.
pub async fn list_interactions(db: &Db, user_id: i64) -> Result<Vec<InteractionRow>> {
	let rows = sqlx::query_as::<_, InteractionRow>(
		"\
SELECT user_id, coordi_id, action_type, interacted_at, NULL::integer AS duration_seconds
FROM user_coordi_interactions
WHERE user_id = $1
UNION ALL
SELECT user_id, coordi_id, 'view' AS action_type, view_started_at AS interacted_at, duration_seconds
FROM user_coordi_view_logs
WHERE user_id = $1
ORDER BY interacted_at, coordi_id",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn list_preferred_hashtags(db: &Db, user_id: i64) -> Result<Vec<i64>> {
	let rows: Vec<i64> = sqlx::query_scalar(
		"\
SELECT hashtag_id
FROM user_hashtag_preferences
WHERE user_id = $1
ORDER BY hashtag_id",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn list_hashtags(db: &Db) -> Result<Vec<HashtagRow>> {
	let rows = sqlx::query_as::<_, HashtagRow>(
		"SELECT hashtag_id, name FROM hashtags ORDER BY hashtag_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Replaces a user's onboarding choices and marks onboarding complete.
///
/// Earlier hashtag preferences and `preference` interactions are dropped. Sample outfits the user
/// already liked or skipped keep that interaction instead of gaining a `preference` row. Unknown
/// ids violate the foreign keys and surface as [`Error::InvalidArgument`].
pub async fn replace_preferences(
	db: &Db,
	user_id: i64,
	hashtag_ids: &[i64],
	sample_coordi_ids: &[i64],
) -> Result<OffsetDateTime> {
	match replace_preferences_tx(db, user_id, hashtag_ids, sample_coordi_ids).await {
		Err(Error::Sqlx(sqlx::Error::Database(err))) if err.is_foreign_key_violation() =>
			Err(Error::InvalidArgument(format!("Unknown preference id: {}", err.message()))),
		other => other,
	}
}

pub async fn find_user(db: &Db, user_id: i64) -> Result<Option<UserRow>> {
	let row = sqlx::query_as::<_, UserRow>("SELECT user_id, gender FROM users WHERE user_id = $1")
		.bind(user_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(row)
}

/// Records a like.
///
/// An existing non-like interaction on the same outfit is promoted to a like. A second like is
/// rejected with [`Error::Conflict`], both by the explicit check and by the partial unique index.
pub async fn insert_like(db: &Db, user_id: i64, coordi_id: i64) -> Result<OffsetDateTime> {
	let mut tx = db.pool.begin().await?;

	if !coordi_exists(&mut *tx, coordi_id).await? {
		return Err(Error::NotFound(format!("Coordi {coordi_id} does not exist.")));
	}

	let liked_at = match like_or_promote(&mut tx, user_id, coordi_id).await {
		Err(Error::Sqlx(sqlx::Error::Database(err))) if err.is_unique_violation() =>
			return Err(already_liked(coordi_id)),
		other => other?,
	};

	tx.commit().await?;

	Ok(liked_at)
}

/// Appends a view log entry and returns its timestamp. Repeated views are separate rows.
pub async fn insert_view_log(
	db: &Db,
	user_id: i64,
	coordi_id: i64,
	duration_seconds: i32,
) -> Result<OffsetDateTime> {
	if duration_seconds < 0 {
		return Err(Error::InvalidArgument("duration_seconds must be zero or greater.".to_string()));
	}

	let mut tx = db.pool.begin().await?;

	if !coordi_exists(&mut *tx, coordi_id).await? {
		return Err(Error::NotFound(format!("Coordi {coordi_id} does not exist.")));
	}

	let recorded_at: OffsetDateTime = sqlx::query_scalar(
		"\
INSERT INTO user_coordi_view_logs (user_id, coordi_id, duration_seconds)
VALUES ($1, $2, $3)
RETURNING view_started_at",
	)
	.bind(user_id)
	.bind(coordi_id)
	.bind(duration_seconds)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(recorded_at)
}

async fn replace_preferences_tx(
	db: &Db,
	user_id: i64,
	hashtag_ids: &[i64],
	sample_coordi_ids: &[i64],
) -> Result<OffsetDateTime> {
	let mut tx = db.pool.begin().await?;
	let updated = sqlx::query("UPDATE users SET has_completed_onboarding = true WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut *tx)
		.await?;

	if updated.rows_affected() == 0 {
		return Err(Error::NotFound(format!("User {user_id} does not exist.")));
	}

	sqlx::query("DELETE FROM user_hashtag_preferences WHERE user_id = $1")
		.bind(user_id)
		.execute(&mut *tx)
		.await?;
	sqlx::query(
		"\
INSERT INTO user_hashtag_preferences (user_id, hashtag_id)
SELECT $1, t.hashtag_id
FROM unnest($2::bigint[]) AS t(hashtag_id)
ON CONFLICT DO NOTHING",
	)
	.bind(user_id)
	.bind(hashtag_ids)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"DELETE FROM user_coordi_interactions WHERE user_id = $1 AND action_type = 'preference'",
	)
	.bind(user_id)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"\
INSERT INTO user_coordi_interactions (user_id, coordi_id, action_type)
SELECT $1, t.coordi_id, 'preference'
FROM (SELECT DISTINCT coordi_id FROM unnest($2::bigint[]) AS u(coordi_id)) AS t
WHERE NOT EXISTS (
	SELECT 1
	FROM user_coordi_interactions x
	WHERE x.user_id = $1 AND x.coordi_id = t.coordi_id
)",
	)
	.bind(user_id)
	.bind(sample_coordi_ids)
	.execute(&mut *tx)
	.await?;

	let saved_at: OffsetDateTime = sqlx::query_scalar("SELECT now()").fetch_one(&mut *tx).await?;

	tx.commit().await?;

	Ok(saved_at)
}

async fn like_or_promote(
	conn: &mut PgConnection,
	user_id: i64,
	coordi_id: i64,
) -> Result<OffsetDateTime> {
	let existing: Option<(i64, String)> = sqlx::query_as(
		"\
SELECT interaction_id, action_type
FROM user_coordi_interactions
WHERE user_id = $1 AND coordi_id = $2
ORDER BY (action_type = 'like') DESC, interaction_id
LIMIT 1
FOR UPDATE",
	)
	.bind(user_id)
	.bind(coordi_id)
	.fetch_optional(&mut *conn)
	.await?;

	match existing {
		Some((_, action_type)) if action_type == "like" => Err(already_liked(coordi_id)),
		Some((interaction_id, _)) => {
			let liked_at: OffsetDateTime = sqlx::query_scalar(
				"\
UPDATE user_coordi_interactions
SET action_type = 'like', interacted_at = now()
WHERE interaction_id = $1
RETURNING interacted_at",
			)
			.bind(interaction_id)
			.fetch_one(&mut *conn)
			.await?;

			Ok(liked_at)
		},
		None => {
			let liked_at: OffsetDateTime = sqlx::query_scalar(
				"\
INSERT INTO user_coordi_interactions (user_id, coordi_id, action_type)
VALUES ($1, $2, 'like')
RETURNING interacted_at",
			)
			.bind(user_id)
			.bind(coordi_id)
			.fetch_one(&mut *conn)
			.await?;

			Ok(liked_at)
		},
	}
}

fn already_liked(coordi_id: i64) -> Error {
	Error::Conflict(format!("Coordi {coordi_id} is already liked."))
}
