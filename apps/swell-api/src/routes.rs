use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};

use crate::{
	auth::{self, AuthError},
	query::{self, FieldError, RecommendationQuery},
	state::AppState,
};
use swell_service::{
	Error, FavoriteResponse, PreferenceOptions, PreferencesSaved, RecommendRequest,
	RecommendResponse, SavePreferencesRequest, ViewResponse,
};

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
	pub success: bool,
	pub data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBody {
	pub duration_seconds: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreferenceOptionsQuery {
	pub gender: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", message, None),
			Error::InvalidField { field, message } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"INVALID_REQUEST",
				message,
				Some(vec![field.to_string()]),
			),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "OUTFIT_NOT_FOUND", message, None),
			Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "ALREADY_FAVORITED", message, None),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Internal storage error.",
					None,
				)
			},
		}
	}
}

impl From<FieldError> for ApiError {
	fn from(err: FieldError) -> Self {
		json_error(
			StatusCode::UNPROCESSABLE_ENTITY,
			"INVALID_REQUEST",
			err.message,
			Some(vec![err.field.to_string()]),
		)
	}
}

impl From<AuthError> for ApiError {
	fn from(err: AuthError) -> Self {
		if let AuthError::Lookup(message) = &err {
			tracing::error!(error = %message, "User lookup failed.");
		}

		json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string(), None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/recommendations", get(recommendations))
		.route("/outfits/{outfit_id}/favorite", post(add_favorite))
		.route("/outfits/{outfit_id}/view", post(record_view))
		.route("/users/preferences/options", get(preference_options))
		.route("/users/preferences", post(set_preferences))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

fn envelope<T>(data: T) -> Json<Envelope<T>> {
	Json(Envelope { success: true, data })
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommendations(
	State(state): State<AppState>,
	headers: HeaderMap,
	query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<Envelope<RecommendResponse>>, ApiError> {
	let Query(query) = query.map_err(|err| {
		json_error(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", err.to_string(), None)
	})?;
	let params = query.parse()?;
	let user = auth::optional_user(&state, &headers).await;
	let response = state
		.service
		.recommend(RecommendRequest {
			user,
			page: params.page,
			limit: params.limit,
			onboarding: params.onboarding,
		})
		.await?;

	Ok(envelope(response))
}

async fn add_favorite(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(outfit_id): Path<String>,
) -> Result<Json<Envelope<FavoriteResponse>>, ApiError> {
	let user = auth::authenticate(&state, &headers).await?;
	let outfit_id = query::parse_id("outfitId", &outfit_id)?;
	let response = state.service.add_favorite(user.user_id, outfit_id).await?;

	Ok(envelope(response))
}

async fn record_view(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(outfit_id): Path<String>,
	payload: Result<Json<ViewBody>, JsonRejection>,
) -> Result<Json<Envelope<ViewResponse>>, ApiError> {
	let user = auth::authenticate(&state, &headers).await?;
	let outfit_id = query::parse_id("outfitId", &outfit_id)?;
	let Json(body) = payload.map_err(|err| {
		json_error(
			StatusCode::UNPROCESSABLE_ENTITY,
			"INVALID_REQUEST",
			err.body_text(),
			Some(vec!["durationSeconds".to_string()]),
		)
	})?;

	if body.duration_seconds < 0 {
		return Err(json_error(
			StatusCode::UNPROCESSABLE_ENTITY,
			"INVALID_REQUEST",
			"durationSeconds must be zero or greater.",
			Some(vec!["durationSeconds".to_string()]),
		));
	}

	let response = state.service.record_view(user.user_id, outfit_id, body.duration_seconds).await?;

	Ok(envelope(response))
}

async fn preference_options(
	State(state): State<AppState>,
	headers: HeaderMap,
	query: Result<Query<PreferenceOptionsQuery>, QueryRejection>,
) -> Result<Json<Envelope<PreferenceOptions>>, ApiError> {
	let Query(query) = query.map_err(|err| {
		json_error(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", err.to_string(), None)
	})?;
	let user = auth::optional_user(&state, &headers).await;
	let gender = query.gender.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
	let response = state.service.preference_options(user.as_ref(), gender).await?;

	Ok(envelope(response))
}

/// Stores the onboarding selection for an authenticated caller. Anonymous callers, including ones
/// whose token does not verify, only get the selection validated.
async fn set_preferences(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<SavePreferencesRequest>, JsonRejection>,
) -> Result<Json<Envelope<PreferencesSaved>>, ApiError> {
	let Json(body) = payload.map_err(|err| {
		json_error(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", err.body_text(), None)
	})?;
	let user = auth::optional_user(&state, &headers).await;
	let response = state.service.set_preferences(user.as_ref(), &body).await?;

	Ok(envelope(response))
}
