use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub embedding: Embedding,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub composer: Composer,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub composer: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Embedding cache and batching limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Embedding {
	/// Maximum number of distinct texts kept in the in-process cache.
	pub cache_capacity: u64,
	/// Maximum number of texts sent to the model in one request.
	pub batch_size: u32,
}
impl Default for Embedding {
	fn default() -> Self {
		Self { cache_capacity: 1_000, batch_size: 32 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ranking {
	/// Multiplier applied to cosine similarity against the preference vector.
	pub similarity_weight: f32,
	/// Additive bonus per onboarding hashtag shared with a candidate.
	pub hashtag_bonus: f32,
	/// Order used when the request carries no usable signal.
	pub fallback_order: FallbackOrder,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			similarity_weight: 1.0,
			hashtag_bonus: 0.1,
			fallback_order: FallbackOrder::default(),
		}
	}
}

/// Order used when a request carries no usable signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackOrder {
	/// Newest outfits first.
	#[default]
	Recency,
	/// Most liked outfits first.
	Popularity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Composer {
	pub enabled: bool,
	pub timeout_ms: u64,
	pub max_concurrency: u32,
	pub fallback_message: String,
}
impl Default for Composer {
	fn default() -> Self {
		Self {
			enabled: true,
			timeout_ms: 3_000,
			max_concurrency: 8,
			fallback_message: default_fallback_message(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub jwt_secret: String,
	#[serde(default)]
	pub bind_localhost_only: bool,
}

fn default_fallback_message() -> String {
	"당신의 취향에 맞춰 고른 코디예요.".to_string()
}
