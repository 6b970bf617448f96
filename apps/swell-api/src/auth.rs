use axum::http::{HeaderMap, header::AUTHORIZATION};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use swell_domain::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	/// User id as a decimal string.
	pub sub: String,
	pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("Authorization header is missing.")]
	MissingCredentials,
	#[error("Authorization header must be a bearer token.")]
	MalformedHeader,
	#[error("Token is invalid: {0}")]
	InvalidToken(String),
	#[error("User {0} does not exist.")]
	UnknownUser(i64),
	#[error("User lookup failed: {0}")]
	Lookup(String),
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
	let raw = headers.get(AUTHORIZATION).ok_or(AuthError::MissingCredentials)?;
	let raw = raw.to_str().map_err(|_| AuthError::MalformedHeader)?.trim();
	let (scheme, token) = raw.split_once(' ').ok_or(AuthError::MalformedHeader)?;

	if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
		return Err(AuthError::MalformedHeader);
	}

	Ok(token.trim())
}

/// Verifies an HS256 token and returns the user id carried in `sub`.
pub fn verify_token(secret: &str, token: &str) -> Result<i64, AuthError> {
	let validation = Validation::new(Algorithm::HS256);
	let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
		.map_err(|err| AuthError::InvalidToken(err.to_string()))?;

	data.claims
		.sub
		.trim()
		.parse()
		.map_err(|_| AuthError::InvalidToken("sub is not a user id.".to_string()))
}

/// Resolves the caller from the `Authorization` header.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, AuthError> {
	let token = bearer_token(headers)?;
	let user_id = verify_token(state.jwt_secret(), token)?;

	state
		.service
		.find_user(user_id)
		.await
		.map_err(|err| AuthError::Lookup(err.to_string()))?
		.ok_or(AuthError::UnknownUser(user_id))
}

/// Like [`authenticate`], but any failure means "anonymous".
pub async fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<UserProfile> {
	match authenticate(state, headers).await {
		Ok(user) => Some(user),
		Err(AuthError::MissingCredentials) => None,
		Err(err) => {
			tracing::debug!(error = %err, "Authentication failed. Serving cold start.");

			None
		},
	}
}
