use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const MIN_PREFERRED_HASHTAGS: usize = 3;
pub const MAX_PREFERRED_HASHTAGS: usize = 10;
pub const REQUIRED_SAMPLE_OUTFITS: usize = 5;
/// Number of sample outfits offered on the onboarding screen.
pub const SAMPLE_OUTFIT_OPTIONS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
	pub hashtag_id: i64,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
	#[error(
		"hashtagIds must hold {min}-{max} ids, got {0}.",
		min = MIN_PREFERRED_HASHTAGS,
		max = MAX_PREFERRED_HASHTAGS
	)]
	HashtagCount(usize),
	#[error("sampleOutfitIds must hold exactly {n} ids, got {0}.", n = REQUIRED_SAMPLE_OUTFITS)]
	SampleOutfitCount(usize),
	#[error("Unknown hashtag ids: {0:?}.")]
	UnknownHashtags(Vec<i64>),
	#[error("Unknown sample outfit ids: {0:?}.")]
	UnknownSampleOutfits(Vec<i64>),
}
impl SelectionError {
	/// Request field the error refers to.
	pub fn field(&self) -> &'static str {
		match self {
			Self::HashtagCount(_) | Self::UnknownHashtags(_) => "hashtagIds",
			Self::SampleOutfitCount(_) | Self::UnknownSampleOutfits(_) => "sampleOutfitIds",
		}
	}
}

/// Hashtags and sample outfits picked during onboarding, deduplicated and count-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSelection {
	hashtag_ids: BTreeSet<i64>,
	sample_outfit_ids: BTreeSet<i64>,
}
impl PreferenceSelection {
	pub fn new(hashtag_ids: &[i64], sample_outfit_ids: &[i64]) -> Result<Self, SelectionError> {
		let hashtag_ids: BTreeSet<i64> = hashtag_ids.iter().copied().collect();
		let sample_outfit_ids: BTreeSet<i64> = sample_outfit_ids.iter().copied().collect();

		if !(MIN_PREFERRED_HASHTAGS..=MAX_PREFERRED_HASHTAGS).contains(&hashtag_ids.len()) {
			return Err(SelectionError::HashtagCount(hashtag_ids.len()));
		}
		if sample_outfit_ids.len() != REQUIRED_SAMPLE_OUTFITS {
			return Err(SelectionError::SampleOutfitCount(sample_outfit_ids.len()));
		}

		Ok(Self { hashtag_ids, sample_outfit_ids })
	}

	pub fn hashtag_ids(&self) -> Vec<i64> {
		self.hashtag_ids.iter().copied().collect()
	}

	pub fn sample_outfit_ids(&self) -> Vec<i64> {
		self.sample_outfit_ids.iter().copied().collect()
	}

	/// Fails with the ids of this selection that are absent from `known`.
	pub fn check_hashtags_known(&self, known: &BTreeSet<i64>) -> Result<(), SelectionError> {
		let unknown: Vec<i64> = self.hashtag_ids.difference(known).copied().collect();

		if unknown.is_empty() { Ok(()) } else { Err(SelectionError::UnknownHashtags(unknown)) }
	}

	pub fn check_sample_outfits_known(&self, known: &BTreeSet<i64>) -> Result<(), SelectionError> {
		let unknown: Vec<i64> = self.sample_outfit_ids.difference(known).copied().collect();

		if unknown.is_empty() { Ok(()) } else { Err(SelectionError::UnknownSampleOutfits(unknown)) }
	}
}
