use std::sync::Arc;

use diesel::insert_into;
use petshop_backend_model::db::{BoxedSqlConn, schema};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::{Result, database::DatabaseService, storage::StorageService};

pub mod tables;

use tables::*;

/// Tables covered by backup snapshots, in dependency order for readability.
///
/// `sessions` is deliberately absent: bearer tokens must not travel in
/// snapshot files, and stale sessions are worthless after a restore.
pub const BACKUP_TABLES: &[&str] = &[
	"neighborhood",
	"breed",
	"category",
	"supplier",
	"client",
	"pet",
	"grooming_service",
	"product",
	"appointment",
	"appointment_item",
	"payment_method",
	"payment",
	"adoption_listing",
	"adoption_story",
	"users",
];

/// A parsed snapshot: table name to array of row objects.
pub type Snapshot = Map<String, Value>;

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct RestoreSummary {
	pub tables: usize,
	pub rows: usize,
}

/// Snapshot export and atomic restore.
///
/// Export reads whole tables into memory and keys them by table name.
/// Restore is all-or-nothing: one transaction, referential integrity
/// enforcement suspended, truncate-then-insert per table, rollback on any
/// error.
#[derive(Debug)]
pub struct BackupService {
	db: Arc<DatabaseService>,
	storage: Arc<StorageService>,
}

impl BackupService {
	pub fn new(db: Arc<DatabaseService>, storage: Arc<StorageService>) -> Self {
		Self { db, storage }
	}

	/// Exports all rows of the given tables as one snapshot object.
	///
	/// Any failing table aborts the whole export; nothing partial is
	/// returned.
	pub async fn export(&self, tables: &[String]) -> Result<Snapshot> {
		for table in tables {
			if !BACKUP_TABLES.contains(&table.as_str()) {
				return Err(BackupError::UnknownTable(table.clone()).into());
			}
		}

		let mut conn = self.db.get().await?;
		let mut snapshot = Snapshot::new();
		for table in tables {
			let rows = dump_table(&mut conn, table).await?;
			snapshot.insert(table.clone(), rows);
		}
		info!(tables = tables.len(), "exported backup snapshot");
		Ok(snapshot)
	}

	/// Exports a snapshot and stores it, returning the object key.
	pub async fn export_to_storage(&self, tables: &[String]) -> Result<String> {
		let snapshot = self.export(tables).await?;
		let bytes =
			serde_json::to_vec(&Value::Object(snapshot)).map_err(BackupError::MalformedSnapshot)?;
		let key = self.storage.put("backups", "json", &bytes).await?;
		Ok(key)
	}

	/// Restores the snapshot stored under `path`.
	pub async fn restore_from_storage(&self, path: &str) -> Result<RestoreSummary> {
		let bytes = self.storage.get(path).await?;
		let snapshot: Value =
			serde_json::from_slice(&bytes).map_err(BackupError::MalformedSnapshot)?;
		let Value::Object(snapshot) = snapshot else {
			return Err(BackupError::NotAnObject.into());
		};
		self.restore(&snapshot).await
	}

	/// Replaces the contents of every table present in the snapshot.
	///
	/// Runs in a single transaction with referential-integrity enforcement
	/// suspended, so the processing order of tables does not matter. Any
	/// failure rolls the whole restore back.
	pub async fn restore(&self, snapshot: &Snapshot) -> Result<RestoreSummary> {
		for table in snapshot.keys() {
			if !BACKUP_TABLES.contains(&table.as_str()) {
				return Err(BackupError::UnknownTable(table.clone()).into());
			}
		}

		let mut conn = self.db.get().await?;
		let summary = conn
			.transaction::<_, crate::BackendError, _>(async |conn| {
				let is_pg = conn.is_pg();
				if is_pg {
					conn.batch_execute("SET session_replication_role = replica")
						.await?;
				} else {
					conn.batch_execute("PRAGMA defer_foreign_keys = ON").await?;
				}

				let mut rows = 0;
				for (table, value) in snapshot {
					let clear = if is_pg {
						format!("TRUNCATE TABLE \"{table}\" RESTART IDENTITY CASCADE")
					} else {
						format!("DELETE FROM \"{table}\"")
					};
					conn.batch_execute(&clear)
						.await
						.map_err(|source| BackupError::RestoreTable {
							table: table.clone(),
							source,
						})?;
					rows += insert_table(conn, table, value).await?;
				}

				if is_pg {
					// rows were inserted with explicit ids, so the identity
					// sequences must be moved past the restored maximum
					for table in snapshot.keys() {
						conn.batch_execute(&format!(
							"SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
							 COALESCE((SELECT MAX(id) FROM \"{table}\"), 0) + 1, false)"
						))
						.await?;
					}
					conn.batch_execute("SET session_replication_role = DEFAULT")
						.await?;
				}

				Ok(RestoreSummary {
					tables: snapshot.len(),
					rows,
				})
			})
			.await?;

		warn!(
			tables = summary.tables,
			rows = summary.rows,
			"restored backup snapshot over live data"
		);
		Ok(summary)
	}
}

async fn dump_table(conn: &mut BoxedSqlConn, table: &str) -> Result<Value> {
	macro_rules! dump {
		($source:path, $row:ty) => {{
			let rows: Vec<$row> =
				conn.load_select($source)
					.await
					.map_err(|source| BackupError::ExportTable {
						table: table.to_owned(),
						source,
					})?;
			serde_json::to_value(rows).map_err(BackupError::MalformedSnapshot)?
		}};
	}

	Ok(match table {
		"neighborhood" => dump!(schema::neighborhood::table, NeighborhoodRow),
		"breed" => dump!(schema::breed::table, BreedRow),
		"category" => dump!(schema::category::table, CategoryRow),
		"supplier" => dump!(schema::supplier::table, SupplierRow),
		"client" => dump!(schema::client::table, ClientRow),
		"pet" => dump!(schema::pet::table, PetRow),
		"grooming_service" => dump!(schema::grooming_service::table, GroomingServiceRow),
		"product" => dump!(schema::product::table, ProductRow),
		"appointment" => dump!(schema::appointment::table, AppointmentRow),
		"appointment_item" => dump!(schema::appointment_item::table, AppointmentItemRow),
		"payment_method" => dump!(schema::payment_method::table, PaymentMethodRow),
		"payment" => dump!(schema::payment::table, PaymentRow),
		"adoption_listing" => dump!(schema::adoption_listing::table, AdoptionListingRow),
		"adoption_story" => dump!(schema::adoption_story::table, AdoptionStoryRow),
		"users" => dump!(schema::users::table, UserRow),
		_ => return Err(BackupError::UnknownTable(table.to_owned()).into()),
	})
}

async fn insert_table(conn: &mut BoxedSqlConn, table: &str, value: &Value) -> Result<usize> {
	macro_rules! restore {
		($target:path, $row:ty) => {{
			let rows: Vec<$row> = serde_json::from_value(value.clone()).map_err(|source| {
				BackupError::MalformedTable {
					table: table.to_owned(),
					source,
				}
			})?;
			let count = rows.len();
			if !rows.is_empty() {
				conn.execute(insert_into($target).values(rows))
					.await
					.map_err(|source| BackupError::RestoreTable {
						table: table.to_owned(),
						source,
					})?;
			}
			count
		}};
	}

	Ok(match table {
		"neighborhood" => restore!(schema::neighborhood::table, NeighborhoodRow),
		"breed" => restore!(schema::breed::table, BreedRow),
		"category" => restore!(schema::category::table, CategoryRow),
		"supplier" => restore!(schema::supplier::table, SupplierRow),
		"client" => restore!(schema::client::table, ClientRow),
		"pet" => restore!(schema::pet::table, PetRow),
		"grooming_service" => restore!(schema::grooming_service::table, GroomingServiceRow),
		"product" => restore!(schema::product::table, ProductRow),
		"appointment" => restore!(schema::appointment::table, AppointmentRow),
		"appointment_item" => restore!(schema::appointment_item::table, AppointmentItemRow),
		"payment_method" => restore!(schema::payment_method::table, PaymentMethodRow),
		"payment" => restore!(schema::payment::table, PaymentRow),
		"adoption_listing" => restore!(schema::adoption_listing::table, AdoptionListingRow),
		"adoption_story" => restore!(schema::adoption_story::table, AdoptionStoryRow),
		"users" => restore!(schema::users::table, UserRow),
		_ => return Err(BackupError::UnknownTable(table.to_owned()).into()),
	})
}

#[derive(Debug, Error)]
pub enum BackupError {
	#[error("unknown table: {0}")]
	UnknownTable(String),
	#[error("failed to export table {table}: {source}")]
	ExportTable {
		table: String,
		#[source]
		source: diesel::result::Error,
	},
	#[error("failed to restore table {table}: {source}")]
	RestoreTable {
		table: String,
		#[source]
		source: diesel::result::Error,
	},
	#[error("malformed snapshot: {0}")]
	MalformedSnapshot(#[source] serde_json::Error),
	#[error("malformed snapshot rows for table {table}: {source}")]
	MalformedTable {
		table: String,
		#[source]
		source: serde_json::Error,
	},
	#[error("snapshot must be a JSON object keyed by table name")]
	NotAnObject,
}

#[cfg(test)]
mod test {
	use diesel::{ExpressionMethods, QueryDsl};
	use petshop_backend_model::db::schema::{category::dsl as cat, client::dsl as c};
	use serde_json::json;

	use super::*;
	use crate::{BackendError, sql_now, test::test_env};

	async fn seed_clients(env: &crate::BackendServices, names: &[&str]) {
		let mut conn = env.database.get().await.unwrap();
		for name in names {
			conn.execute(
				insert_into(c::client).values((
					c::name.eq(*name),
					c::phone.eq(format!("+55 11 9{}", name.len())),
					c::created_at.eq(sql_now()),
				)),
			)
			.await
			.unwrap();
		}
	}

	fn owned(tables: &[&str]) -> Vec<String> {
		tables.iter().map(|t| t.to_string()).collect()
	}

	#[tokio::test]
	async fn test_export_unknown_table() {
		let env = test_env().await;
		let err = env.backup.export(&owned(&["job_queue"])).await.unwrap_err();
		assert!(matches!(
			err,
			BackendError::BackupError(BackupError::UnknownTable(_))
		));
	}

	#[tokio::test]
	async fn test_export_restore_roundtrip() {
		let env = test_env().await;
		seed_clients(&env, &["Maria", "Ana", "Pedro"]).await;

		let tables = owned(&["client", "users"]);
		let before = env.backup.export(&tables).await.unwrap();
		assert_eq!(before["client"].as_array().unwrap().len(), 3);
		assert_eq!(before["users"].as_array().unwrap().len(), 1);

		// diverge from the snapshot, then restore over it
		seed_clients(&env, &["Intruder"]).await;
		{
			let mut conn = env.database.get().await.unwrap();
			conn.execute(diesel::update(c::client).set(c::name.eq("renamed")))
				.await
				.unwrap();
		}

		let summary = env.backup.restore(&before).await.unwrap();
		assert_eq!(summary, RestoreSummary { tables: 2, rows: 4 });
		let after = env.backup.export(&tables).await.unwrap();
		assert_eq!(before, after);
	}

	#[tokio::test]
	async fn test_restore_small_single_table() {
		let env = test_env().await;
		let snapshot = json!({
			"category": [
				{ "id": 1, "name": "food" },
				{ "id": 2, "name": "toys" },
				{ "id": 3, "name": "hygiene" },
			]
		});
		let Value::Object(snapshot) = snapshot else {
			unreachable!()
		};
		let summary = env.backup.restore(&snapshot).await.unwrap();
		assert_eq!(summary, RestoreSummary { tables: 1, rows: 3 });

		let mut conn = env.database.get().await.unwrap();
		let names: Vec<String> = conn
			.load(cat::category.order(cat::id.asc()).select(cat::name))
			.await
			.unwrap();
		assert_eq!(names, ["food", "toys", "hygiene"]);
	}

	#[tokio::test]
	async fn test_restore_rolls_back_on_malformed_table() {
		let env = test_env().await;
		seed_clients(&env, &["Maria", "Ana"]).await;

		// tables restore in key order: "client" parses fine and is cleared
		// first, "pet" then fails, which must undo the clearing as well
		let snapshot = json!({
			"client": [],
			"pet": [{ "id": 1 }],
		});
		let Value::Object(snapshot) = snapshot else {
			unreachable!()
		};
		let err = env.backup.restore(&snapshot).await.unwrap_err();
		assert!(matches!(
			err,
			BackendError::BackupError(BackupError::MalformedTable { .. })
		));

		let mut conn = env.database.get().await.unwrap();
		assert_eq!(
			conn.get_result::<_, i64>(c::client.count()).await.unwrap(),
			2
		);
	}

	#[tokio::test]
	async fn test_storage_roundtrip() {
		let env = test_env().await;
		seed_clients(&env, &["Maria"]).await;

		let key = env
			.backup
			.export_to_storage(&owned(&["client"]))
			.await
			.unwrap();
		let summary = env.backup.restore_from_storage(&key).await.unwrap();
		assert_eq!(summary, RestoreSummary { tables: 1, rows: 1 });

		let err = env
			.backup
			.restore_from_storage("backups/missing.json")
			.await
			.unwrap_err();
		assert!(matches!(err, BackendError::StorageError(_)));
	}
}
