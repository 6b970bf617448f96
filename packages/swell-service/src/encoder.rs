use std::{collections::BTreeMap, sync::Arc};

use moka::future::Cache;
use tokio::sync::OnceCell;

use crate::{EmbeddingModel, EmbeddingProvider, vector};
use swell_config::{Config, EmbeddingProviderConfig};

/// Text-to-vector encoder with a lazily loaded model and a bounded, shared result cache.
///
/// Every vector handed out is either unit length or the all-zero fallback. Empty text, model
/// load failures, model errors and malformed model output all produce the zero vector; none of
/// them surface as errors and none of them are cached.
pub struct VectorEncoder {
	cfg: EmbeddingProviderConfig,
	provider: Arc<dyn EmbeddingProvider>,
	model: OnceCell<Arc<dyn EmbeddingModel>>,
	cache: Cache<String, Arc<[f32]>>,
	zero: Arc<[f32]>,
	batch_size: usize,
}
impl VectorEncoder {
	pub fn new(cfg: &Config, provider: Arc<dyn EmbeddingProvider>) -> Self {
		let dims = cfg.providers.embedding.dimensions as usize;

		Self {
			cfg: cfg.providers.embedding.clone(),
			provider,
			model: OnceCell::new(),
			cache: Cache::builder().max_capacity(cfg.embedding.cache_capacity).build(),
			zero: Arc::from(vec![0.0_f32; dims]),
			batch_size: (cfg.embedding.batch_size as usize).max(1),
		}
	}

	pub fn dims(&self) -> usize {
		self.zero.len()
	}

	pub fn zero(&self) -> Arc<[f32]> {
		self.zero.clone()
	}

	pub fn is_loaded(&self) -> bool {
		self.model.initialized()
	}

	/// Approximate number of cached texts. Call [`VectorEncoder::sync_cache`] first for an exact
	/// figure.
	pub fn cached_entries(&self) -> u64 {
		self.cache.entry_count()
	}

	/// Applies pending cache maintenance such as evictions.
	pub async fn sync_cache(&self) {
		self.cache.run_pending_tasks().await;
	}

	pub async fn embed(&self, text: &str) -> Arc<[f32]> {
		if text.trim().is_empty() {
			return self.zero();
		}

		// Concurrent misses on the same key share a single model call.
		self.cache
			.optionally_get_with(text.to_string(), self.compute_one(text))
			.await
			.unwrap_or_else(|| self.zero())
	}

	/// Embeds `texts` in order, serving hits from the cache and batching the distinct misses.
	pub async fn embed_many(&self, texts: &[String]) -> Vec<Arc<[f32]>> {
		let mut out = vec![self.zero(); texts.len()];
		let mut misses: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

		for (idx, text) in texts.iter().enumerate() {
			if text.trim().is_empty() {
				continue;
			}

			match self.cache.get(text.as_str()).await {
				Some(hit) => out[idx] = hit,
				None => misses.entry(text.as_str()).or_default().push(idx),
			}
		}

		tracing::debug!(
			requested = texts.len(),
			misses = misses.len(),
			"Embedding cache lookup finished."
		);

		if misses.is_empty() {
			return out;
		}

		let Some(model) = self.model().await else {
			return out;
		};
		let pending: Vec<(&str, Vec<usize>)> = misses.into_iter().collect();

		for chunk in pending.chunks(self.batch_size) {
			let batch: Vec<String> = chunk.iter().map(|(text, _)| (*text).to_string()).collect();
			let vectors = match model.encode(&batch).await {
				Ok(vectors) if vectors.len() == batch.len() => vectors,
				Ok(vectors) => {
					tracing::warn!(
						expected = batch.len(),
						got = vectors.len(),
						"Embedding model returned the wrong number of vectors."
					);

					continue;
				},
				Err(err) => {
					tracing::warn!(error = %err, batch = batch.len(), "Embedding batch failed.");

					continue;
				},
			};

			for ((text, indices), raw) in chunk.iter().zip(vectors) {
				let Some(vec) = self.finish(raw) else {
					continue;
				};

				self.cache.insert((*text).to_string(), vec.clone()).await;

				for idx in indices {
					out[*idx] = vec.clone();
				}
			}
		}

		out
	}

	async fn compute_one(&self, text: &str) -> Option<Arc<[f32]>> {
		let model = self.model().await?;
		let input = [text.to_string()];

		match model.encode(&input).await {
			Ok(mut vectors) if vectors.len() == 1 => self.finish(vectors.pop()?),
			Ok(vectors) => {
				tracing::warn!(
					expected = 1,
					got = vectors.len(),
					"Embedding model returned the wrong number of vectors."
				);

				None
			},
			Err(err) => {
				tracing::warn!(error = %err, "Embedding failed.");

				None
			},
		}
	}

	/// Returns the model, loading it on first use. A failed load is retried by the next caller.
	async fn model(&self) -> Option<Arc<dyn EmbeddingModel>> {
		let loaded = self
			.model
			.get_or_try_init(|| async {
				tracing::info!(
					provider_id = %self.cfg.provider_id,
					model = %self.cfg.model,
					"Loading embedding model."
				);

				self.provider.load(&self.cfg).await
			})
			.await;

		match loaded {
			Ok(model) => Some(model.clone()),
			Err(err) => {
				tracing::warn!(error = %err, "Embedding model load failed.");

				None
			},
		}
	}

	fn finish(&self, mut raw: Vec<f32>) -> Option<Arc<[f32]>> {
		if raw.len() != self.dims() {
			tracing::warn!(
				expected = self.dims(),
				got = raw.len(),
				"Embedding dimension mismatch."
			);

			return None;
		}
		if raw.iter().any(|value| !value.is_finite()) {
			tracing::warn!("Embedding contains non-finite values.");

			return None;
		}
		if !vector::normalize(&mut raw) {
			return None;
		}

		Some(Arc::from(raw))
	}
}
