use std::sync::Arc;

use diesel::{ExpressionMethods, QueryDsl, Queryable, Selectable};
use petshop_backend_model::{
	adoption::SqlAdoptionStatus,
	appointment::SqlAppointmentStatus,
	db::schema::{
		self as schema, adoption_listing::dsl as al, appointment::dsl as a, client::dsl as c,
		payment::dsl as pay, product::dsl as pr,
	},
};
use serde::Serialize;
use thiserror::Error;
use time::Date;

use crate::{Result, database::DatabaseService};

/// Precomputed aggregates for the admin dashboard and reports, the
/// server-side counterpart of the hosted database's RPC endpoints.
#[derive(Debug)]
pub struct ReportService {
	db: Arc<DatabaseService>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct DashboardMetrics {
	pub appointments_today: i64,
	pub clients_total: i64,
	pub adoptable_pets: i64,
	pub revenue_cents: i64,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct AttendanceReport {
	pub completed: u32,
	pub canceled: u32,
	/// All appointments in range that left the pending state.
	pub total: u32,
	/// `completed / total`, 0 when the range is empty.
	pub rate: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = schema::product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LowStockProduct {
	pub id: i64,
	pub name: String,
	pub stock: i32,
	pub min_stock: i32,
}

impl ReportService {
	pub fn new(db: Arc<DatabaseService>) -> Self {
		Self { db }
	}

	pub async fn dashboard(&self, today: Date) -> Result<DashboardMetrics> {
		let mut conn = self.db.get().await?;
		let appointments_today: i64 = conn
			.get_result(
				a::appointment
					.filter(a::scheduled_date.eq(today))
					.filter(a::status.ne(SqlAppointmentStatus::Canceled as i16))
					.count(),
			)
			.await?;
		let clients_total: i64 = conn.get_result(c::client.count()).await?;
		let adoptable_pets: i64 = conn
			.get_result(
				al::adoption_listing
					.filter(al::status.eq(SqlAdoptionStatus::Available as i16))
					.count(),
			)
			.await?;
		// only payments on completed appointments count towards revenue;
		// SUM(bigint) widens to numeric on PostgreSQL, so the handful of
		// payment rows is summed here instead
		let amounts: Vec<i64> = conn
			.load(
				pay::payment
					.inner_join(a::appointment)
					.filter(a::status.eq(SqlAppointmentStatus::Completed as i16))
					.select(pay::amount_cents),
			)
			.await?;
		let revenue_cents = amounts.iter().sum();

		Ok(DashboardMetrics {
			appointments_today,
			clients_total,
			adoptable_pets,
			revenue_cents,
		})
	}

	/// Attendance over an inclusive date range.
	pub async fn attendance(&self, from: Date, to: Date) -> Result<AttendanceReport> {
		if from > to {
			return Err(ReportError::EmptyRange { from, to }.into());
		}
		let mut conn = self.db.get().await?;
		let statuses: Vec<i16> = conn
			.load(
				a::appointment
					.filter(a::scheduled_date.ge(from))
					.filter(a::scheduled_date.le(to))
					.filter(a::status.ne(SqlAppointmentStatus::Pending as i16))
					.select(a::status),
			)
			.await?;

		let mut completed = 0;
		let mut canceled = 0;
		for status in &statuses {
			match SqlAppointmentStatus::from(*status) {
				SqlAppointmentStatus::Completed => completed += 1,
				SqlAppointmentStatus::Canceled => canceled += 1,
				_ => {}
			}
		}
		let total = statuses.len() as u32;
		let rate = if total == 0 {
			0.0
		} else {
			completed as f64 / total as f64
		};

		Ok(AttendanceReport {
			completed,
			canceled,
			total,
			rate,
		})
	}

	/// Products whose stock fell to or under their minimum.
	pub async fn low_stock(&self) -> Result<Vec<LowStockProduct>> {
		let mut conn = self.db.get().await?;
		Ok(conn
			.load_select(pr::product.filter(pr::stock.le(pr::min_stock)))
			.await?)
	}
}

#[derive(Debug, Error)]
pub enum ReportError {
	#[error("invalid report range: {from} to {to}")]
	EmptyRange { from: Date, to: Date },
}
