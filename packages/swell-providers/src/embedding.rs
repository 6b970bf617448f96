use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

use swell_config::EmbeddingProviderConfig;

/// Handle to a remote sentence-embedding model.
///
/// Building the handle sets up the HTTP client, auth headers and timeout once; every
/// [`EmbeddingClient::embed`] call reuses it.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
	client: Client,
	url: String,
	model: String,
	dimensions: u32,
}
impl EmbeddingClient {
	pub fn connect(cfg: &EmbeddingProviderConfig) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.build()?;

		Ok(Self {
			client,
			url: format!("{}{}", cfg.api_base, cfg.path),
			model: cfg.model.clone(),
			dimensions: cfg.dimensions,
		})
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let body = serde_json::json!({
			"model": self.model,
			"input": texts,
			"dimensions": self.dimensions,
		});
		let res = self.client.post(&self.url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;
		let vectors = parse_embedding_response(json)?;

		if vectors.len() != texts.len() {
			return Err(eyre::eyre!(
				"Embedding response returned {} vectors for {} inputs.",
				vectors.len(),
				texts.len()
			));
		}

		Ok(vectors)
	}
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item missing embedding array."))?;
		let mut vec = Vec::with_capacity(embedding.len());
		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;
			vec.push(number as f32);
		}
		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
