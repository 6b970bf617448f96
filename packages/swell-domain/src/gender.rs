use serde::{Deserialize, Serialize};

const MALE_SYNONYMS: [&str; 4] = ["male", "m", "남성", "남자"];
const FEMALE_SYNONYMS: [&str; 4] = ["female", "f", "여성", "여자"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
	Male,
	Female,
	Unisex,
}
impl Gender {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Male => "male",
			Self::Female => "female",
			Self::Unisex => "unisex",
		}
	}

	/// Parses the catalog spelling. Unlike [`normalize_gender`], this accepts `unisex`.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_lowercase().as_str() {
			"male" => Some(Self::Male),
			"female" => Some(Self::Female),
			"unisex" => Some(Self::Unisex),
			_ => None,
		}
	}

	/// Whether an outfit tagged with `self` may be shown under `filter`.
	///
	/// Unisex outfits pass every filter; no filter admits everything.
	pub fn admitted_by(self, filter: Option<Gender>) -> bool {
		match filter {
			None => true,
			Some(wanted) => self == wanted || self == Self::Unisex,
		}
	}
}

/// Maps user-facing gender input onto a ranking filter.
///
/// Only male and female synonyms resolve; anything else means "no gender filter".
pub fn normalize_gender(raw: &str) -> Option<Gender> {
	let lowered = raw.trim().to_lowercase();

	if MALE_SYNONYMS.contains(&lowered.as_str()) {
		return Some(Gender::Male);
	}
	if FEMALE_SYNONYMS.contains(&lowered.as_str()) {
		return Some(Gender::Female);
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unisex_passes_any_filter() {
		assert!(Gender::Unisex.admitted_by(Some(Gender::Female)));
		assert!(Gender::Unisex.admitted_by(Some(Gender::Male)));
		assert!(!Gender::Male.admitted_by(Some(Gender::Female)));
		assert!(Gender::Male.admitted_by(None));
	}
}
