use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::service::{ApiServiceInfo, ServiceConfigInfo};
use petshop_backend_model::db::schema::{self, grooming_service::dsl as gs};
use petshop_backend_service::{BackendServices, database::SqlConnRef};

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::grooming_service)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SqlApiServiceInfo {
	id: i64,
	name: String,
	description: Option<String>,
	price_cents: i64,
	duration_min: i32,
	active: bool,
}

impl From<SqlApiServiceInfo> for ApiServiceInfo {
	fn from(row: SqlApiServiceInfo) -> Self {
		ApiServiceInfo {
			id: row.id,
			name: row.name,
			description: row.description,
			price_cents: row.price_cents,
			duration_min: row.duration_min,
			active: row.active,
		}
	}
}

async fn service_info(db: &mut SqlConnRef, id: i64) -> ApiResult<Json<ApiServiceInfo>> {
	let row: SqlApiServiceInfo = db
		.load_one_select(gs::grooming_service.filter(gs::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

pub async fn list_services(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiServiceInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiServiceInfo> = db.load_select(gs::grooming_service).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_service(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<Json<ApiServiceInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiServiceInfo> = db
		.load_one_select(gs::grooming_service.filter(gs::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "service not found")?;
	Ok(Json(row.into()))
}

pub async fn new_service(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<ServiceConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiServiceInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(gs::grooming_service)
				.values((
					gs::name.eq(&info.name),
					gs::description.eq(info.description.as_deref()),
					gs::price_cents.eq(info.price_cents),
					gs::duration_min.eq(info.duration_min),
					gs::active.eq(info.active),
				))
				.returning(gs::id),
		)
		.await?;

	Ok((StatusCode::CREATED, service_info(&mut db, id).await?))
}

pub async fn update_service(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<ServiceConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiServiceInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(gs::grooming_service.filter(gs::id.eq(id))).set((
			gs::name.eq(&info.name),
			gs::description.eq(info.description.as_deref()),
			gs::price_cents.eq(info.price_cents),
			gs::duration_min.eq(info.duration_min),
			gs::active.eq(info.active),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "service not found"));
	}

	Ok((StatusCode::ACCEPTED, service_info(&mut db, id).await?))
}

pub async fn delete_service(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(gs::grooming_service.filter(gs::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "service not found"));
	}
	Ok((StatusCode::ACCEPTED, "service deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::service::ApiServiceInfo;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_inactive_service_hidden_from_public() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		for (name, active) in [("Bath", true), ("Old combo", false)] {
			let response = send(
				&router,
				json_request(
					"POST",
					"/api/service",
					Some(&token),
					&json!({
						"name": name,
						"description": null,
						"price_cents": 5000,
						"duration_min": 45,
						"active": active,
					}),
				),
			)
			.await;
			assert_eq!(response.status(), StatusCode::CREATED);
		}

		// the admin listing sees both, the public catalog only the active one
		let response = send(&router, request("GET", "/api/service", Some(&token))).await;
		let all: Vec<ApiServiceInfo> = read_json(response).await;
		assert_eq!(all.len(), 2);

		let response = send(&router, request("GET", "/public/service", None)).await;
		assert_eq!(response.status(), StatusCode::OK);
		let public: Vec<ApiServiceInfo> = read_json(response).await;
		assert_eq!(public.len(), 1);
		assert_eq!(public[0].name, "Bath");
	}
}
