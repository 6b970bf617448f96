use serde::Deserialize;

use swell_domain::MAX_PAGE_LIMIT;
use swell_service::Onboarding;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Raw `GET /recommendations` query. Every value arrives as a string so that large ids survive
/// clients with lossy number types; [`RecommendationQuery::parse`] does the coercion.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
	pub page: Option<String>,
	pub limit: Option<String>,
	pub gender: Option<String>,
	#[serde(default)]
	pub hashtag_ids: Vec<String>,
	#[serde(default)]
	pub sample_outfit_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationParams {
	pub page: u32,
	pub limit: u32,
	pub onboarding: Onboarding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: &'static str,
	pub message: String,
}

impl RecommendationQuery {
	pub fn parse(self) -> Result<RecommendationParams, FieldError> {
		let page = parse_bounded("page", self.page.as_deref(), DEFAULT_PAGE, 1, u32::MAX)?;
		let limit =
			parse_bounded("limit", self.limit.as_deref(), DEFAULT_LIMIT, 1, MAX_PAGE_LIMIT)?;
		let gender = self.gender.filter(|raw| !raw.trim().is_empty());
		let hashtag_ids = parse_ids("hashtagIds", &self.hashtag_ids)?;
		let sample_outfit_ids = parse_ids("sampleOutfitIds", &self.sample_outfit_ids)?;

		Ok(RecommendationParams {
			page,
			limit,
			onboarding: Onboarding { gender, hashtag_ids, sample_outfit_ids },
		})
	}
}

pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, FieldError> {
	raw.trim().parse::<i64>().map_err(|_| FieldError {
		field,
		message: format!("{field} must be an integer id, got {raw:?}."),
	})
}

fn parse_bounded(
	field: &'static str,
	raw: Option<&str>,
	default: u32,
	min: u32,
	max: u32,
) -> Result<u32, FieldError> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(default);
	};
	let out_of_range =
		|| FieldError { field, message: format!("{field} must be an integer in {min}..={max}.") };
	let value: i64 = raw.parse().map_err(|_| out_of_range())?;

	if value < i64::from(min) || value > i64::from(max) {
		return Err(out_of_range());
	}

	u32::try_from(value).map_err(|_| out_of_range())
}

fn parse_ids(field: &'static str, raw: &[String]) -> Result<Vec<i64>, FieldError> {
	raw.iter()
		.filter(|value| !value.trim().is_empty())
		.map(|value| parse_id(field, value))
		.collect()
}
