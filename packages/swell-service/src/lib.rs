pub mod composer;
pub mod encoder;
pub mod feedback;
pub mod memory;
pub mod onboarding;
pub mod preference;
pub mod ranking;
pub mod recommend;
pub mod store;
pub mod time_serde;
pub mod vector;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use encoder::VectorEncoder;
pub use error::{Error, Result};
pub use feedback::{FavoriteResponse, ViewResponse};
pub use memory::MemoryStore;
pub use onboarding::{
	HashtagOption, OnboardedUser, PreferenceOptions, PreferencesSaved, SampleOutfit,
	SavePreferencesRequest,
};
pub use preference::{Onboarding, PreferenceSignal, SignalSource};
pub use ranking::{FallbackOrder, MatchReason, RankedCoordi, RankedPage, RankingParams};
pub use recommend::{RecommendRequest, RecommendResponse, RecommendedCoordi};
pub use store::{CatalogStore, InteractionStore, UserStore};
use swell_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use swell_providers::{composer as composer_client, embedding::EmbeddingClient};
use swell_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Loads the sentence-embedding model. Called at most once per successful load.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn load<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
	) -> BoxFuture<'a, color_eyre::Result<Arc<dyn EmbeddingModel>>>;
}

/// A loaded sentence-embedding model. Returns one raw vector per input, in input order.
pub trait EmbeddingModel
where
	Self: Send + Sync,
{
	fn encode<'a>(&'a self, texts: &'a [String])
	-> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait MessageProvider
where
	Self: Send + Sync,
{
	fn compose<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub composer: Arc<dyn MessageProvider>,
}

pub struct SwellService {
	pub cfg: Config,
	pub catalog: Arc<dyn CatalogStore>,
	pub interactions: Arc<dyn InteractionStore>,
	pub users: Arc<dyn UserStore>,
	pub encoder: VectorEncoder,
	pub providers: Providers,
	ranking: RankingParams,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn load<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
	) -> BoxFuture<'a, color_eyre::Result<Arc<dyn EmbeddingModel>>> {
		Box::pin(async move {
			let client = EmbeddingClient::connect(cfg)?;

			tracing::info!(model = client.model(), "Embedding model loaded.");

			Ok(Arc::new(client) as Arc<dyn EmbeddingModel>)
		})
	}
}

impl EmbeddingModel for EmbeddingClient {
	fn encode<'a>(
		&'a self,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(self.embed(texts))
	}
}

impl MessageProvider for DefaultProviders {
	fn compose<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(composer_client::compose(cfg, messages))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, composer: Arc<dyn MessageProvider>) -> Self {
		Self { embedding, composer }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), composer: provider }
	}
}

impl SwellService {
	/// Builds the service over Postgres with the HTTP-backed providers.
	pub fn new(cfg: Config, db: Db) -> Self {
		let db = Arc::new(db);

		Self::with_parts(cfg, db.clone(), db.clone(), db, Providers::default())
	}

	pub fn with_parts(
		cfg: Config,
		catalog: Arc<dyn CatalogStore>,
		interactions: Arc<dyn InteractionStore>,
		users: Arc<dyn UserStore>,
		providers: Providers,
	) -> Self {
		let encoder = VectorEncoder::new(&cfg, providers.embedding.clone());
		let ranking = RankingParams::from_config(&cfg.ranking);

		Self { cfg, catalog, interactions, users, encoder, providers, ranking }
	}

	/// Builds the service over a single in-process store.
	pub fn in_memory(cfg: Config, store: Arc<MemoryStore>, providers: Providers) -> Self {
		Self::with_parts(cfg, store.clone(), store.clone(), store, providers)
	}

	pub fn ranking_params(&self) -> &RankingParams {
		&self.ranking
	}

	/// Resolves a verified user id to the profile the recommender works with.
	pub async fn find_user(&self, user_id: i64) -> Result<Option<swell_domain::UserProfile>> {
		self.users.find_user(user_id).await
	}
}
