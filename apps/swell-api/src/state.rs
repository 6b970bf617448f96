use std::sync::Arc;

use swell_service::SwellService;
use swell_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SwellService>,
}
impl AppState {
	pub async fn new(config: swell_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = SwellService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: SwellService) -> Self {
		Self { service: Arc::new(service) }
	}

	pub fn jwt_secret(&self) -> &str {
		&self.service.cfg.security.jwt_secret
	}
}
