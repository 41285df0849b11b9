use axum::{
	Json,
	extract::{Query, State},
};
use petshop_backend_service::{
	BackendServices, sql_now,
	reports::{AttendanceReport, DashboardMetrics, LowStockProduct},
};
use serde::Deserialize;
use time::Date;

use super::{auth::AuthUser, error::ApiResult};

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
	date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceParams {
	from: Date,
	to: Date,
}

pub async fn dashboard(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardMetrics>> {
	let date = params.date.unwrap_or_else(|| sql_now().date());
	Ok(Json(backend.reports.dashboard(date).await?))
}

pub async fn attendance(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Query(params): Query<AttendanceParams>,
) -> ApiResult<Json<AttendanceReport>> {
	Ok(Json(
		backend.reports.attendance(params.from, params.to).await?,
	))
}

pub async fn low_stock(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<LowStockProduct>>> {
	Ok(Json(backend.reports.low_stock().await?))
}
