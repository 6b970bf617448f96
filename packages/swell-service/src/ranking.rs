use std::{cmp::Ordering, collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{PreferenceSignal, vector};
use swell_domain::{Coordi, PageRequest, Pagination};

pub use swell_config::FallbackOrder;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingParams {
	pub similarity_weight: f32,
	pub hashtag_bonus: f32,
	pub fallback_order: FallbackOrder,
}
impl RankingParams {
	pub fn from_config(cfg: &swell_config::Ranking) -> Self {
		Self {
			similarity_weight: cfg.similarity_weight,
			hashtag_bonus: cfg.hashtag_bonus,
			fallback_order: cfg.fallback_order,
		}
	}
}

/// Why an outfit made it into the result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchReason {
	Hashtag { hashtag_ids: Vec<i64> },
	Similarity { score: f32 },
	Fallback { order: FallbackOrder },
}
impl MatchReason {
	/// Short description handed to the message composer.
	pub fn describe(&self) -> String {
		match self {
			Self::Hashtag { hashtag_ids } => {
				let ids: Vec<String> = hashtag_ids.iter().map(|id| id.to_string()).collect();

				format!("shares the preferred hashtags {}", ids.join(", "))
			},
			Self::Similarity { score } => {
				format!("is similar to outfits the user liked (similarity {score:.2})")
			},
			Self::Fallback { order: FallbackOrder::Recency } => {
				"is one of the newest outfits".to_string()
			},
			Self::Fallback { order: FallbackOrder::Popularity } => {
				"is one of the most liked outfits".to_string()
			},
		}
	}
}

/// A candidate with its embedding, when the request has a vector to compare against.
#[derive(Debug, Clone)]
pub struct Candidate {
	pub coordi: Coordi,
	pub embedding: Option<Arc<[f32]>>,
}

#[derive(Debug, Clone)]
pub struct RankedCoordi {
	pub coordi: Coordi,
	pub score: f32,
	pub reason: MatchReason,
}

#[derive(Debug, Clone)]
pub struct RankedPage {
	pub items: Vec<RankedCoordi>,
	pub pagination: Pagination,
	/// Whether the zero-signal fallback order was used.
	pub fallback: bool,
}

/// Whether `coordi` may appear in a result for `signal` given `exclusions`.
pub fn is_eligible(coordi: &Coordi, signal: &PreferenceSignal, exclusions: &BTreeSet<i64>) -> bool {
	coordi.gender.admitted_by(signal.gender) && !exclusions.contains(&coordi.coordi_id)
}

/// Scores, orders and pages the candidates.
///
/// Score is `similarity_weight * cosine + hashtag_bonus * matching hashtags`. If the signal has no
/// vector and no candidate matches a hashtag, candidates are ordered by the fallback order
/// instead. Ties always break by ascending id, so identical inputs produce identical pages.
pub fn rank(
	signal: &PreferenceSignal,
	exclusions: &BTreeSet<i64>,
	candidates: Vec<Candidate>,
	params: &RankingParams,
	page: PageRequest,
) -> RankedPage {
	let eligible: Vec<Candidate> = candidates
		.into_iter()
		.filter(|candidate| is_eligible(&candidate.coordi, signal, exclusions))
		.collect();
	let mut scored: Vec<RankedCoordi> =
		eligible.into_iter().map(|candidate| score(signal, candidate, params)).collect();
	let fallback = !signal.has_vector()
		&& scored.iter().all(|item| !matches!(item.reason, MatchReason::Hashtag { .. }));

	if fallback {
		let order = params.fallback_order;

		for item in &mut scored {
			item.score = 0.0;
			item.reason = MatchReason::Fallback { order };
		}

		scored.sort_by(|a, b| fallback_cmp(order, &a.coordi, &b.coordi));
	} else {
		scored.sort_by(|a, b| {
			b.score.total_cmp(&a.score).then_with(|| a.coordi.coordi_id.cmp(&b.coordi.coordi_id))
		});
	}

	let total = scored.len();
	let window = page.window(total);
	let items: Vec<RankedCoordi> = scored.drain(window).collect();
	let pagination = Pagination::for_slice(page, total, items.len());

	RankedPage { items, pagination, fallback }
}

fn score(signal: &PreferenceSignal, candidate: Candidate, params: &RankingParams) -> RankedCoordi {
	let similarity = match candidate.embedding.as_deref() {
		Some(embedding) if signal.has_vector() => vector::cosine(&signal.vector, embedding),
		_ => 0.0,
	};
	let matched: Vec<i64> = candidate
		.coordi
		.hashtag_ids
		.iter()
		.copied()
		.filter(|id| signal.hashtag_ids.contains(id))
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect();
	let score = params.similarity_weight * similarity + params.hashtag_bonus * matched.len() as f32;
	let reason = if matched.is_empty() {
		MatchReason::Similarity { score: similarity }
	} else {
		MatchReason::Hashtag { hashtag_ids: matched }
	};

	RankedCoordi { coordi: candidate.coordi, score, reason }
}

fn fallback_cmp(order: FallbackOrder, a: &Coordi, b: &Coordi) -> Ordering {
	let primary = match order {
		FallbackOrder::Recency => b.created_at.cmp(&a.created_at),
		FallbackOrder::Popularity => b.like_count.cmp(&a.like_count),
	};

	primary.then_with(|| a.coordi_id.cmp(&b.coordi_id))
}

#[cfg(test)]
mod tests {
	use time::{Duration, OffsetDateTime};

	use super::*;
	use crate::SignalSource;
	use swell_domain::Gender;

	fn coordi(id: i64, gender: Gender, hashtags: &[i64], age_days: i64, likes: i64) -> Coordi {
		Coordi {
			coordi_id: id,
			description: format!("outfit {id}"),
			gender,
			hashtag_ids: hashtags.to_vec(),
			image_urls: Vec::new(),
			like_count: likes,
			created_at: OffsetDateTime::UNIX_EPOCH + Duration::days(1_000 - age_days),
		}
	}

	fn empty_signal(gender: Option<Gender>) -> PreferenceSignal {
		PreferenceSignal {
			vector: Arc::from(vec![0.0_f32; 2]),
			hashtag_ids: BTreeSet::new(),
			gender,
			source: SignalSource::Empty,
		}
	}

	fn candidates(coordis: Vec<Coordi>) -> Vec<Candidate> {
		coordis.into_iter().map(|coordi| Candidate { coordi, embedding: None }).collect()
	}

	fn params(order: FallbackOrder) -> RankingParams {
		RankingParams { similarity_weight: 1.0, hashtag_bonus: 0.1, fallback_order: order }
	}

	fn ids(page: &RankedPage) -> Vec<i64> {
		page.items.iter().map(|item| item.coordi.coordi_id).collect()
	}

	#[test]
	fn fallback_by_recency_breaks_ties_by_id() {
		let catalog = vec![
			coordi(3, Gender::Male, &[], 5, 0),
			coordi(1, Gender::Male, &[], 1, 0),
			coordi(2, Gender::Male, &[], 1, 0),
		];
		let page = PageRequest::new(1, 10).expect("valid page");
		let ranked = rank(
			&empty_signal(None),
			&BTreeSet::new(),
			candidates(catalog),
			&params(FallbackOrder::Recency),
			page,
		);

		assert!(ranked.fallback);
		assert_eq!(ids(&ranked), vec![1, 2, 3]);
	}

	#[test]
	fn fallback_by_popularity_uses_like_count() {
		let catalog = vec![
			coordi(1, Gender::Female, &[], 1, 2),
			coordi(2, Gender::Female, &[], 1, 9),
			coordi(3, Gender::Unisex, &[], 1, 2),
		];
		let page = PageRequest::new(1, 10).expect("valid page");
		let ranked = rank(
			&empty_signal(Some(Gender::Female)),
			&BTreeSet::new(),
			candidates(catalog),
			&params(FallbackOrder::Popularity),
			page,
		);

		assert_eq!(ids(&ranked), vec![2, 1, 3]);
		assert!(matches!(
			ranked.items[0].reason,
			MatchReason::Fallback { order: FallbackOrder::Popularity }
		));
	}

	#[test]
	fn unmatched_hashtags_still_fall_back() {
		let mut signal = empty_signal(None);

		signal.hashtag_ids.insert(99);

		let catalog = vec![coordi(1, Gender::Male, &[1], 1, 0)];
		let page = PageRequest::new(1, 10).expect("valid page");
		let recency = params(FallbackOrder::Recency);
		let ranked = rank(&signal, &BTreeSet::new(), candidates(catalog), &recency, page);

		assert!(ranked.fallback);
	}

	#[test]
	fn hashtag_bonus_counts_each_matching_tag() {
		let mut signal = empty_signal(None);

		signal.hashtag_ids.extend([1, 2]);

		let catalog = vec![
			coordi(1, Gender::Male, &[1], 1, 0),
			coordi(2, Gender::Male, &[1, 2], 1, 0),
			coordi(3, Gender::Male, &[], 1, 0),
		];
		let page = PageRequest::new(1, 10).expect("valid page");
		let recency = params(FallbackOrder::Recency);
		let ranked = rank(&signal, &BTreeSet::new(), candidates(catalog), &recency, page);

		assert!(!ranked.fallback);
		assert_eq!(ids(&ranked), vec![2, 1, 3]);
		assert!((ranked.items[0].score - 0.2).abs() < 1e-6);
		assert_eq!(ranked.items[2].reason, MatchReason::Similarity { score: 0.0 });
	}

	#[test]
	fn page_past_the_end_is_empty_with_total() {
		let catalog = vec![coordi(1, Gender::Male, &[], 1, 0), coordi(2, Gender::Male, &[], 1, 0)];
		let page = PageRequest::new(3, 1).expect("valid page");
		let ranked = rank(
			&empty_signal(None),
			&BTreeSet::from([2]),
			candidates(catalog),
			&params(FallbackOrder::Recency),
			page,
		);

		assert!(ranked.items.is_empty());
		assert_eq!(ranked.pagination.total, 1);
		assert!(!ranked.pagination.has_next);
	}
}
