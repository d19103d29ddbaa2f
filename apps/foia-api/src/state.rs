use std::sync::Arc;

use foia_service::ExplorerService;
use foia_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ExplorerService>,
}
impl AppState {
	/// Connects to the corpus database. `bootstrap_schema` creates missing tables, for local
	/// development against an empty database.
	pub async fn new(config: foia_config::Config, bootstrap_schema: bool) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		if bootstrap_schema {
			db.ensure_schema().await?;
		}

		Ok(Self::from_service(ExplorerService::new(config, db)))
	}

	pub fn from_service(service: ExplorerService) -> Self {
		Self { service: Arc::new(service) }
	}
}
