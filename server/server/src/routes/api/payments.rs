use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
};
use petshop_api_model::payment::{ApiPaymentInfo, PaymentConfigInfo};
use petshop_backend_model::{
	appointment::AppointmentRef,
	db::schema::{
		self, appointment::dsl as a, payment::dsl as pay, payment_method::dsl as pm,
	},
};
use petshop_backend_service::{BackendServices, sql_now};
use serde::Deserialize;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiPaymentInfo {
	id: i64,
	appointment: i64,
	method: i64,
	amount_cents: i64,
	paid_at: time::PrimitiveDateTime,
}

impl From<SqlApiPaymentInfo> for ApiPaymentInfo {
	fn from(row: SqlApiPaymentInfo) -> Self {
		ApiPaymentInfo {
			id: row.id,
			appointment: row.appointment,
			method: row.method,
			amount_cents: row.amount_cents,
			paid_at: row.paid_at,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
	appointment: Option<AppointmentRef>,
}

pub async fn list_payments(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Query(params): Query<PaymentListParams>,
) -> ApiResult<Json<Vec<ApiPaymentInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiPaymentInfo> = match params.appointment {
		Some(appointment) => {
			db.load_select(pay::payment.filter(pay::appointment.eq(appointment)))
				.await?
		}
		None => db.load_select(pay::payment).await?,
	};
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_payment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<Json<ApiPaymentInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiPaymentInfo> = db
		.load_one_select(pay::payment.filter(pay::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "payment not found")?;
	Ok(Json(row.into()))
}

pub async fn new_payment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<PaymentConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiPaymentInfo>)> {
	let mut db = backend.database.get().await?;
	let appointment: Option<i64> = db
		.get_result(
			a::appointment
				.filter(a::id.eq(info.appointment))
				.select(a::id)
				.limit(1),
		)
		.await
		.optional()?;
	appointment.or_api_error(StatusCode::BAD_REQUEST, "unknown appointment")?;
	let method: Option<i64> = db
		.get_result(
			pm::payment_method
				.filter(pm::id.eq(info.method))
				.select(pm::id)
				.limit(1),
		)
		.await
		.optional()?;
	method.or_api_error(StatusCode::BAD_REQUEST, "unknown payment method")?;

	let id: i64 = db
		.get_result(
			insert_into(pay::payment)
				.values((
					pay::appointment.eq(info.appointment),
					pay::method.eq(info.method),
					pay::amount_cents.eq(info.amount_cents),
					pay::paid_at.eq(sql_now()),
				))
				.returning(pay::id),
		)
		.await?;
	let row: SqlApiPaymentInfo = db
		.load_one_select(pay::payment.filter(pay::id.eq(id)).limit(1))
		.await?;

	Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn delete_payment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(pay::payment.filter(pay::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "payment not found"));
	}
	Ok((StatusCode::ACCEPTED, "payment deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_payment_requires_appointment() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/payment",
				Some(&token),
				&json!({"appointment": 42, "method": 1, "amount_cents": 5000}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
