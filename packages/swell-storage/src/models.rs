use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct CoordiRow {
	pub coordi_id: i64,
	pub description: String,
	pub gender: String,
	pub hashtag_ids: Vec<i64>,
	pub image_urls: Vec<String>,
	pub like_count: i64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct InteractionRow {
	pub user_id: i64,
	pub coordi_id: i64,
	pub action_type: String,
	pub interacted_at: OffsetDateTime,
	pub duration_seconds: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
	pub user_id: i64,
	pub gender: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct HashtagRow {
	pub hashtag_id: i64,
	pub name: String,
}
