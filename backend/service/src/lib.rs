//! Pet-shop backend services.

use std::sync::Arc;

use auth::{AuthError, AuthService};
use backup::{BackupError, BackupService};
use booking::{BookingError, BookingService};
use config::BackendConfig;
use database::{DatabaseError, DatabaseService};
use reports::{ReportError, ReportService};
use slots::SlotService;
use storage::{StorageError, StorageService};
use thiserror::Error;
use time::{OffsetDateTime, PrimitiveDateTime};

pub mod auth;
pub mod backup;
pub mod booking;
pub mod config;
pub mod database;
pub mod reports;
pub mod slots;
pub mod storage;

/// Service container for the pet-shop backend.
///
/// All services are wrapped with [`Arc`].
#[derive(Debug, Clone)]
pub struct BackendServices {
	pub config: Arc<BackendConfig>,
	pub slots: Arc<SlotService>,
	pub storage: Arc<StorageService>,
	pub database: Arc<DatabaseService>,
	pub auth: Arc<AuthService>,
	pub booking: Arc<BookingService>,
	pub backup: Arc<BackupService>,
	pub reports: Arc<ReportService>,
}

impl BackendServices {
	#[tracing::instrument(skip(config))]
	pub async fn new(config: BackendConfig) -> Result<Self> {
		let config = Arc::new(config);
		let slots = Arc::new(SlotService::new(&config.slot));
		let storage = Arc::new(StorageService::new(&config.storage)?);
		let database = Arc::new(DatabaseService::new(&config.database).await?);
		let auth = Arc::new(AuthService::new(database.clone()));
		let booking = Arc::new(BookingService::new(database.clone(), slots.clone()));
		let backup = Arc::new(BackupService::new(database.clone(), storage.clone()));
		let reports = Arc::new(ReportService::new(database.clone()));

		auth.ensure_admin(&config.admin).await?;

		Ok(Self {
			config,
			slots,
			storage,
			database,
			auth,
			booking,
			backup,
			reports,
		})
	}
}

/// Backend errors.
#[derive(Debug, Error)]
pub enum BackendError {
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),
	#[error(transparent)]
	DatabaseError(#[from] DatabaseError),
	#[error(transparent)]
	StorageError(#[from] StorageError),
	#[error(transparent)]
	AuthError(#[from] AuthError),
	#[error(transparent)]
	BookingError(#[from] BookingError),
	#[error(transparent)]
	BackupError(#[from] BackupError),
	#[error(transparent)]
	ReportError(#[from] ReportError),
}

/// A specialized [`Result`] for backend errors.
pub type Result<T, E = BackendError> = std::result::Result<T, E>;

impl From<diesel::result::Error> for BackendError {
	fn from(value: diesel::result::Error) -> Self {
		Self::DatabaseError(DatabaseError::QueryError(value))
	}
}

/// The wall clock as a SQL timestamp (UTC, no offset).
pub fn sql_now() -> PrimitiveDateTime {
	let now = OffsetDateTime::now_utc();
	PrimitiveDateTime::new(now.date(), now.time())
}

#[cfg(test)]
pub(crate) mod test {
	use crate::auth::AdminConfig;
	use crate::database::DatabaseConfig;
	use crate::slots::SlotConfig;
	use crate::storage::StorageConfig;

	use crate::*;

	pub async fn test_env() -> BackendServices {
		let config = BackendConfig {
			database: DatabaseConfig {
				url: "sqlite://:memory:".to_string(),
				max_connections: 1,
			},
			storage: StorageConfig {
				path: std::env::temp_dir()
					.join(format!("petshop-test-{}", uuid::Uuid::now_v7())),
			},
			admin: AdminConfig {
				email: "admin@petshop.test".to_string(),
				password: "hunter2".to_string(),
				display_name: "Admin".to_string(),
			},
			slot: vec![
				SlotConfig {
					name: "09:00".into(),
					capacity: 2,
				},
				SlotConfig {
					name: "10:00".into(),
					capacity: 1,
				},
			],
		};
		BackendServices::new(config).await.unwrap()
	}

	#[tokio::test]
	async fn test_init_services() {
		let env = test_env().await;
		assert_eq!(env.slots.len(), 2);
		assert!(
			env.auth
				.authenticate("0000000000000000000000000000000000000000000000000000000000000000")
				.await
				.unwrap()
				.is_none()
		);
	}
}
