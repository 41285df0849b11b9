use petshop_backend_service::{
	auth::AdminConfig, config::BackendConfig, database::DatabaseConfig, slots::SlotConfig,
	storage::StorageConfig,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	pub web: WebConfig,
	pub database: DatabaseConfig,
	pub storage: StorageConfig,
	pub admin: AdminConfig,
	pub slot: Vec<SlotConfig>,
}

impl TryFrom<ServerConfig> for BackendConfig {
	type Error = anyhow::Error;

	fn try_from(config: ServerConfig) -> Result<Self, Self::Error> {
		Ok(BackendConfig {
			database: config.database,
			storage: config.storage,
			admin: config.admin,
			slot: config.slot,
		})
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, Deserialize, Serialize)]
pub struct WebConfig {
	/// Address for the web server to listen on.
	///
	/// Examples:
	/// - `unix://petshop.socket`
	/// - `tcp://127.0.0.1:8000`
	pub listen: String,
}
