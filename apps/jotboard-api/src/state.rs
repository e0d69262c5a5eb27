use std::sync::Arc;

use tower_sessions_sqlx_store::PostgresStore;

use jotboard_service::JotService;
use jotboard_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<JotService>,
	pub sessions: PostgresStore,
}
impl AppState {
	pub async fn new(config: jotboard_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let sessions = PostgresStore::new(db.pool.clone());

		sessions.migrate().await?;

		let service = JotService::new(config, db);

		Ok(Self { service: Arc::new(service), sessions })
	}
}
