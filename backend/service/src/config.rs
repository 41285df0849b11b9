use serde::{Deserialize, Serialize};

use crate::{
	auth::AdminConfig, database::DatabaseConfig, slots::SlotConfig, storage::StorageConfig,
};

#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
	pub database: DatabaseConfig,
	pub storage: StorageConfig,
	pub admin: AdminConfig,
	pub slot: Vec<SlotConfig>,
}
