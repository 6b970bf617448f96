mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Composer, Config, Embedding, EmbeddingProviderConfig, FallbackOrder, LlmProviderConfig,
	Postgres, Providers, Ranking, Security, Service, Storage,
};

use std::{fs, path::Path};

/// Upper bound on the embedding cache, in distinct texts.
pub const MAX_EMBEDDING_CACHE_CAPACITY: u64 = 1_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.composer.timeout_ms", cfg.providers.composer.timeout_ms),
		("composer.timeout_ms", cfg.composer.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.embedding.cache_capacity == 0
		|| cfg.embedding.cache_capacity > MAX_EMBEDDING_CACHE_CAPACITY
	{
		return Err(Error::Validation {
			message: format!(
				"embedding.cache_capacity must be in the range 1-{MAX_EMBEDDING_CACHE_CAPACITY}."
			),
		});
	}
	if cfg.embedding.batch_size == 0 {
		return Err(Error::Validation {
			message: "embedding.batch_size must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.similarity_weight", cfg.ranking.similarity_weight),
		("ranking.hashtag_bonus", cfg.ranking.hashtag_bonus),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if cfg.composer.max_concurrency == 0 {
		return Err(Error::Validation {
			message: "composer.max_concurrency must be greater than zero.".to_string(),
		});
	}
	if cfg.composer.fallback_message.trim().is_empty() {
		return Err(Error::Validation {
			message: "composer.fallback_message must be non-empty.".to_string(),
		});
	}
	if cfg.security.jwt_secret.trim().is_empty() {
		return Err(Error::Validation {
			message: "security.jwt_secret must be non-empty.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("composer", &cfg.providers.composer.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
