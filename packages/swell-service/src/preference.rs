use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{CatalogStore, InteractionStore, Result, VectorEncoder, vector};
use swell_domain::{Gender, UserProfile, normalize_gender};

/// Cold-start input supplied with the request, used when no stored history is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Onboarding {
	/// Raw gender as given by the caller; normalized here.
	pub gender: Option<String>,
	pub hashtag_ids: Vec<i64>,
	pub sample_outfit_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
	History,
	ColdStart,
	Empty,
}

/// What a single request should rank highly. Computed per request, never stored.
#[derive(Debug, Clone)]
pub struct PreferenceSignal {
	/// Unit vector, or all zeros when no text signal exists.
	pub vector: Arc<[f32]>,
	/// Hashtags that earn the ranking bonus.
	pub hashtag_ids: BTreeSet<i64>,
	pub gender: Option<Gender>,
	pub source: SignalSource,
}
impl PreferenceSignal {
	pub fn has_vector(&self) -> bool {
		!vector::is_zero(&self.vector)
	}

	pub fn is_empty(&self) -> bool {
		!self.has_vector() && self.hashtag_ids.is_empty()
	}
}

/// Picks the profile gender when it normalizes, otherwise the caller-supplied one.
pub fn resolve_gender(user: Option<&UserProfile>, requested: Option<&str>) -> Option<Gender> {
	user.and_then(|profile| profile.gender.as_deref())
		.and_then(normalize_gender)
		.or_else(|| requested.and_then(normalize_gender))
}

/// Resolves the preference signal and the exclusion set for one request.
///
/// With a user, liked and preferred outfits are averaged into the preference vector and the
/// user's stored hashtags feed the bonus; liked and skipped outfits are excluded. When the history
/// yields nothing, the onboarding parameters are used instead and the history exclusions still
/// apply. Sample outfit ids that do not exist are skipped.
pub async fn resolve_preferences(
	encoder: &VectorEncoder,
	catalog: &dyn CatalogStore,
	interactions: &dyn InteractionStore,
	user: Option<&UserProfile>,
	onboarding: &Onboarding,
) -> Result<(PreferenceSignal, BTreeSet<i64>)> {
	let gender = resolve_gender(user, onboarding.gender.as_deref());
	let mut exclusions = BTreeSet::new();

	if let Some(profile) = user {
		let history = interactions.list_interactions(profile.user_id).await?;
		let mut positive = BTreeSet::new();

		for interaction in &history {
			if interaction.action.is_exclusion() {
				exclusions.insert(interaction.coordi_id);
			}
			if interaction.action.is_positive() {
				positive.insert(interaction.coordi_id);
			}
		}

		let positive: Vec<i64> = positive.into_iter().collect();
		let vector = mean_outfit_vector(encoder, catalog, &positive).await?;
		let hashtag_ids: BTreeSet<i64> =
			interactions.preferred_hashtag_ids(profile.user_id).await?.into_iter().collect();
		let signal =
			PreferenceSignal { vector, hashtag_ids, gender, source: SignalSource::History };

		tracing::debug!(
			user_id = profile.user_id,
			interactions = history.len(),
			positives = positive.len(),
			exclusions = exclusions.len(),
			has_vector = signal.has_vector(),
			"Resolved history signal."
		);

		if !signal.is_empty() {
			return Ok((signal, exclusions));
		}
	}

	let vector = mean_outfit_vector(encoder, catalog, &onboarding.sample_outfit_ids).await?;
	let hashtag_ids: BTreeSet<i64> = onboarding.hashtag_ids.iter().copied().collect();
	let mut signal =
		PreferenceSignal { vector, hashtag_ids, gender, source: SignalSource::ColdStart };

	if signal.is_empty() {
		signal.source = SignalSource::Empty;
	}

	Ok((signal, exclusions))
}

async fn mean_outfit_vector(
	encoder: &VectorEncoder,
	catalog: &dyn CatalogStore,
	coordi_ids: &[i64],
) -> Result<Arc<[f32]>> {
	if coordi_ids.is_empty() {
		return Ok(encoder.zero());
	}

	let unique: Vec<i64> =
		coordi_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
	let coordis = catalog.get_coordis(&unique).await?;

	if coordis.len() < unique.len() {
		tracing::debug!(
			requested = unique.len(),
			found = coordis.len(),
			"Skipping unknown outfit ids in preference signal."
		);
	}

	let texts: Vec<String> = coordis.into_iter().map(|coordi| coordi.description).collect();
	let vectors = encoder.embed_many(&texts).await;
	let mean = vector::mean_normalized(vectors.iter().map(|vec| &vec[..]), encoder.dims());

	Ok(Arc::from(mean))
}
