use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Gender;

/// A catalog outfit. Read-only from the recommender's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordi {
	pub coordi_id: i64,
	pub description: String,
	pub gender: Gender,
	pub hashtag_ids: Vec<i64>,
	pub image_urls: Vec<String>,
	/// Number of active likes, used as the popularity proxy.
	pub like_count: i64,
	pub created_at: OffsetDateTime,
}
impl Coordi {
	pub fn shares_hashtag(&self, hashtag_id: i64) -> bool {
		self.hashtag_ids.contains(&hashtag_id)
	}
}
