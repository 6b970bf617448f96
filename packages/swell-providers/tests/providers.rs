use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

use swell_config::EmbeddingProviderConfig;
use swell_providers::embedding::EmbeddingClient;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		swell_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");
	assert_eq!(value, "Bearer secret");
}

#[test]
fn copies_default_headers() {
	let mut extra = Map::new();
	extra.insert("x-tenant".to_string(), Value::String("swell".to_string()));

	let headers =
		swell_providers::auth_headers("secret", &extra).expect("Failed to build headers.");
	let value =
		headers.get(HeaderName::from_static("x-tenant")).expect("Missing default header.");
	assert_eq!(value, "swell");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut extra = Map::new();
	extra.insert("x-retries".to_string(), Value::from(3));

	assert!(swell_providers::auth_headers("secret", &extra).is_err());
}

#[test]
fn embedding_client_keeps_model_name() {
	let cfg = EmbeddingProviderConfig {
		provider_id: "local".to_string(),
		api_base: "http://127.0.0.1:8000".to_string(),
		api_key: "key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "sentence-transformers/distiluse-base-multilingual-cased-v2".to_string(),
		dimensions: 512,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	};
	let client = EmbeddingClient::connect(&cfg).expect("Failed to build embedding client.");

	assert_eq!(client.model(), "sentence-transformers/distiluse-base-multilingual-cased-v2");
}
