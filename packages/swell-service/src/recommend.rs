use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	MatchReason, Onboarding, Result, SwellService, composer, preference,
	ranking::{self, Candidate},
};
use swell_domain::{Gender, PageRequest, Pagination, UserProfile};

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
	/// Authenticated caller, if any. `None` is the cold-start path.
	pub user: Option<UserProfile>,
	pub page: u32,
	pub limit: u32,
	#[serde(default)]
	pub onboarding: Onboarding,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCoordi {
	pub id: i64,
	pub description: String,
	pub gender: Gender,
	pub hashtag_ids: Vec<i64>,
	pub image_urls: Vec<String>,
	pub like_count: i64,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub score: f32,
	pub reason: MatchReason,
	pub llm_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
	pub outfits: Vec<RecommendedCoordi>,
	pub pagination: Pagination,
}

impl SwellService {
	/// Ranks the catalog for one caller and returns a page with a message per outfit.
	///
	/// Only `page`/`limit` are validated here; missing users, empty onboarding input, encoder
	/// failures and composer failures all degrade to fallbacks rather than errors.
	pub async fn recommend(&self, req: RecommendRequest) -> Result<RecommendResponse> {
		let page = PageRequest::new(req.page, req.limit)?;
		let request_id = Uuid::new_v4();
		let user_id = req.user.as_ref().map(|user| user.user_id);
		let (signal, exclusions) = preference::resolve_preferences(
			&self.encoder,
			self.catalog.as_ref(),
			self.interactions.as_ref(),
			req.user.as_ref(),
			&req.onboarding,
		)
		.await?;
		let catalog = self.catalog.list_coordis(signal.gender).await?;
		let eligible: Vec<_> = catalog
			.into_iter()
			.filter(|coordi| ranking::is_eligible(coordi, &signal, &exclusions))
			.collect();
		let embeddings = if signal.has_vector() {
			let texts: Vec<String> =
				eligible.iter().map(|coordi| coordi.description.clone()).collect();

			self.encoder.embed_many(&texts).await.into_iter().map(Some).collect()
		} else {
			vec![None; eligible.len()]
		};
		let candidates: Vec<Candidate> = eligible
			.into_iter()
			.zip(embeddings)
			.map(|(coordi, embedding)| Candidate { coordi, embedding })
			.collect();
		let ranked = ranking::rank(&signal, &exclusions, candidates, &self.ranking, page);

		tracing::info!(
			request_id = %request_id,
			user_id = ?user_id,
			source = ?signal.source,
			gender = signal.gender.map(Gender::as_str),
			excluded = exclusions.len(),
			total = ranked.pagination.total,
			returned = ranked.items.len(),
			fallback = ranked.fallback,
			"Recommendations ranked."
		);

		let messages = composer::compose_messages(
			&self.cfg,
			self.providers.composer.as_ref(),
			signal.gender,
			&ranked.items,
		)
		.await;
		let outfits = ranked
			.items
			.into_iter()
			.zip(messages)
			.map(|(item, llm_message)| RecommendedCoordi {
				id: item.coordi.coordi_id,
				description: item.coordi.description,
				gender: item.coordi.gender,
				hashtag_ids: item.coordi.hashtag_ids,
				image_urls: item.coordi.image_urls,
				like_count: item.coordi.like_count,
				created_at: item.coordi.created_at,
				score: item.score,
				reason: item.reason,
				llm_message,
			})
			.collect();

		Ok(RecommendResponse { outfits, pagination: ranked.pagination })
	}
}
