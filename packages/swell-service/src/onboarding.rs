use std::{cmp::Reverse, collections::BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Result, SwellService, preference};
use swell_domain::{Gender, PreferenceSelection, SAMPLE_OUTFIT_OPTIONS, UserProfile};

const PREFERENCES_SAVED_MESSAGE: &str = "선호도가 저장되었습니다";
const PREFERENCES_VALIDATED_MESSAGE: &str = "선호도가 검증되었습니다";

#[derive(Debug, Clone, Serialize)]
pub struct HashtagOption {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleOutfit {
	pub id: i64,
	pub description: String,
	pub gender: Gender,
	pub hashtag_ids: Vec<i64>,
	pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceOptions {
	pub hashtags: Vec<HashtagOption>,
	pub sample_outfits: Vec<SampleOutfit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreferencesRequest {
	#[serde(default)]
	pub hashtag_ids: Vec<i64>,
	#[serde(default)]
	pub sample_outfit_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedUser {
	pub id: i64,
	pub has_completed_onboarding: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesSaved {
	pub message: String,
	pub user: OnboardedUser,
	#[serde(with = "crate::time_serde::option")]
	pub saved_at: Option<OffsetDateTime>,
}

impl SwellService {
	/// Lists the hashtags and the most liked sample outfits offered during onboarding.
	///
	/// The profile gender wins over `gender`; with neither, sample outfits of every gender are
	/// offered.
	pub async fn preference_options(
		&self,
		user: Option<&UserProfile>,
		gender: Option<&str>,
	) -> Result<PreferenceOptions> {
		let gender = preference::resolve_gender(user, gender);
		let hashtags = self.catalog.list_hashtags().await?;
		let mut coordis = self.catalog.list_coordis(gender).await?;

		coordis.sort_by_key(|coordi| (Reverse(coordi.like_count), coordi.coordi_id));
		coordis.truncate(SAMPLE_OUTFIT_OPTIONS);

		tracing::debug!(
			gender = gender.map(Gender::as_str),
			hashtags = hashtags.len(),
			sample_outfits = coordis.len(),
			"Listed preference options."
		);

		Ok(PreferenceOptions {
			hashtags: hashtags
				.into_iter()
				.map(|hashtag| HashtagOption { id: hashtag.hashtag_id, name: hashtag.name })
				.collect(),
			sample_outfits: coordis
				.into_iter()
				.map(|coordi| SampleOutfit {
					id: coordi.coordi_id,
					description: coordi.description,
					gender: coordi.gender,
					hashtag_ids: coordi.hashtag_ids,
					image_urls: coordi.image_urls,
				})
				.collect(),
		})
	}

	/// Validates an onboarding selection and, for an authenticated user, stores it.
	///
	/// Stored hashtags feed the ranking bonus and stored sample outfits become `preference`
	/// interactions, so later recommendations for the user start from them. Anonymous callers only
	/// get the validation.
	pub async fn set_preferences(
		&self,
		user: Option<&UserProfile>,
		req: &SavePreferencesRequest,
	) -> Result<PreferencesSaved> {
		let selection = PreferenceSelection::new(&req.hashtag_ids, &req.sample_outfit_ids)?;
		let known_hashtags: BTreeSet<i64> = self
			.catalog
			.list_hashtags()
			.await?
			.into_iter()
			.map(|hashtag| hashtag.hashtag_id)
			.collect();

		selection.check_hashtags_known(&known_hashtags)?;

		let sample_ids = selection.sample_outfit_ids();
		let known_outfits: BTreeSet<i64> = self
			.catalog
			.get_coordis(&sample_ids)
			.await?
			.into_iter()
			.map(|coordi| coordi.coordi_id)
			.collect();

		selection.check_sample_outfits_known(&known_outfits)?;

		let Some(profile) = user else {
			return Ok(PreferencesSaved {
				message: PREFERENCES_VALIDATED_MESSAGE.to_string(),
				user: OnboardedUser { id: 0, has_completed_onboarding: false },
				saved_at: None,
			});
		};
		let hashtag_ids = selection.hashtag_ids();
		let saved_at = self
			.interactions
			.replace_preferences(profile.user_id, &hashtag_ids, &sample_ids)
			.await?;

		tracing::info!(
			user_id = profile.user_id,
			hashtags = hashtag_ids.len(),
			sample_outfits = sample_ids.len(),
			"Preferences saved."
		);

		Ok(PreferencesSaved {
			message: PREFERENCES_SAVED_MESSAGE.to_string(),
			user: OnboardedUser { id: profile.user_id, has_completed_onboarding: true },
			saved_at: Some(saved_at),
		})
	}
}
