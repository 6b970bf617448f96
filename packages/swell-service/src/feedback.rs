use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, Result, SwellService};

const VIEW_RECORDED_MESSAGE: &str = "조회 기록이 저장되었습니다.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
	pub outfit_id: i64,
	pub is_favorited: bool,
	#[serde(with = "crate::time_serde")]
	pub favorited_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
	pub message: String,
	#[serde(with = "crate::time_serde")]
	pub recorded_at: OffsetDateTime,
}

impl SwellService {
	/// Likes an outfit. Unknown outfits are `NotFound`; a repeated like is a `Conflict`.
	pub async fn add_favorite(&self, user_id: i64, coordi_id: i64) -> Result<FavoriteResponse> {
		let favorited_at = self.interactions.insert_like(user_id, coordi_id).await?;

		tracing::info!(user_id, coordi_id, "Favorite recorded.");

		Ok(FavoriteResponse { outfit_id: coordi_id, is_favorited: true, favorited_at })
	}

	/// Appends a view log entry. Views never exclude an outfit from later recommendations.
	pub async fn record_view(
		&self,
		user_id: i64,
		coordi_id: i64,
		duration_seconds: i64,
	) -> Result<ViewResponse> {
		if duration_seconds < 0 {
			return Err(Error::InvalidRequest {
				message: "durationSeconds must be zero or greater.".to_string(),
			});
		}

		let duration = i32::try_from(duration_seconds).map_err(|_| Error::InvalidRequest {
			message: "durationSeconds is too large.".to_string(),
		})?;
		let recorded_at = self.interactions.insert_view(user_id, coordi_id, duration).await?;

		tracing::info!(user_id, coordi_id, duration_seconds, "View recorded.");

		Ok(ViewResponse { message: VIEW_RECORDED_MESSAGE.to_string(), recorded_at })
	}
}
