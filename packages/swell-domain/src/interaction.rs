use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
	View,
	Like,
	Skip,
	Preference,
}
impl ActionType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::View => "view",
			Self::Like => "like",
			Self::Skip => "skip",
			Self::Preference => "preference",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"view" => Some(Self::View),
			"like" => Some(Self::Like),
			"skip" => Some(Self::Skip),
			"preference" => Some(Self::Preference),
			_ => None,
		}
	}

	/// Likes and onboarding preferences pull the preference vector toward the outfit.
	pub fn is_positive(self) -> bool {
		matches!(self, Self::Like | Self::Preference)
	}

	/// Liked and skipped outfits are never recommended again. Views are not excluded.
	pub fn is_exclusion(self) -> bool {
		matches!(self, Self::Like | Self::Skip)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
	pub user_id: i64,
	pub coordi_id: i64,
	pub action: ActionType,
	pub interacted_at: OffsetDateTime,
	pub duration_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	pub user_id: i64,
	/// Raw stored value; normalized by the preference resolver.
	pub gender: Option<String>,
}
