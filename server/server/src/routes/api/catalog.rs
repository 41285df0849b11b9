//! Small lookup tables: categories, neighborhoods, breeds and payment
//! methods.

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, QueryDsl, Queryable, Selectable, delete, insert_into, update,
};
use petshop_api_model::catalog::{
	ApiBreedInfo, ApiCategoryInfo, ApiNeighborhoodInfo, ApiPaymentMethodInfo, BreedConfigInfo,
	NamedConfigInfo, NeighborhoodConfigInfo,
};
use petshop_backend_model::db::schema::{
	self, breed::dsl as br, category::dsl as cat, neighborhood::dsl as n,
	payment_method::dsl as pm,
};
use petshop_backend_service::BackendServices;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlCategory {
	id: i64,
	name: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::payment_method)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlPaymentMethod {
	id: i64,
	name: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::neighborhood)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlNeighborhood {
	id: i64,
	name: String,
	pickup_fee_cents: i64,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::breed)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlBreed {
	id: i64,
	name: String,
	species: String,
}

pub async fn list_categories(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiCategoryInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlCategory> = db.load_select(cat::category).await?;
	Ok(Json(
		rows.into_iter()
			.map(|row| ApiCategoryInfo {
				id: row.id,
				name: row.name,
			})
			.collect(),
	))
}

pub async fn new_category(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<NamedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiCategoryInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(cat::category)
				.values(cat::name.eq(&info.name))
				.returning(cat::id),
		)
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(ApiCategoryInfo {
			id,
			name: info.name,
		}),
	))
}

pub async fn update_category(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<NamedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiCategoryInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(cat::category.filter(cat::id.eq(id))).set(cat::name.eq(&info.name)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "category not found"));
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(ApiCategoryInfo {
			id,
			name: info.name,
		}),
	))
}

pub async fn delete_category(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(cat::category.filter(cat::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "category not found"));
	}
	Ok((StatusCode::ACCEPTED, "category deleted"))
}

pub async fn list_payment_methods(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiPaymentMethodInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlPaymentMethod> = db.load_select(pm::payment_method).await?;
	Ok(Json(
		rows.into_iter()
			.map(|row| ApiPaymentMethodInfo {
				id: row.id,
				name: row.name,
			})
			.collect(),
	))
}

pub async fn new_payment_method(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<NamedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiPaymentMethodInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(pm::payment_method)
				.values(pm::name.eq(&info.name))
				.returning(pm::id),
		)
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(ApiPaymentMethodInfo {
			id,
			name: info.name,
		}),
	))
}

pub async fn update_payment_method(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<NamedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiPaymentMethodInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(
			update(pm::payment_method.filter(pm::id.eq(id))).set(pm::name.eq(&info.name)),
		)
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(
			StatusCode::NOT_FOUND,
			"payment method not found",
		));
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(ApiPaymentMethodInfo {
			id,
			name: info.name,
		}),
	))
}

pub async fn delete_payment_method(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(pm::payment_method.filter(pm::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(
			StatusCode::NOT_FOUND,
			"payment method not found",
		));
	}
	Ok((StatusCode::ACCEPTED, "payment method deleted"))
}

pub async fn list_neighborhoods(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiNeighborhoodInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlNeighborhood> = db.load_select(n::neighborhood).await?;
	Ok(Json(
		rows.into_iter()
			.map(|row| ApiNeighborhoodInfo {
				id: row.id,
				name: row.name,
				pickup_fee_cents: row.pickup_fee_cents,
			})
			.collect(),
	))
}

pub async fn new_neighborhood(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<NeighborhoodConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiNeighborhoodInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(n::neighborhood)
				.values((
					n::name.eq(&info.name),
					n::pickup_fee_cents.eq(info.pickup_fee_cents),
				))
				.returning(n::id),
		)
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(ApiNeighborhoodInfo {
			id,
			name: info.name,
			pickup_fee_cents: info.pickup_fee_cents,
		}),
	))
}

pub async fn update_neighborhood(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<NeighborhoodConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiNeighborhoodInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(n::neighborhood.filter(n::id.eq(id))).set((
			n::name.eq(&info.name),
			n::pickup_fee_cents.eq(info.pickup_fee_cents),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(
			StatusCode::NOT_FOUND,
			"neighborhood not found",
		));
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(ApiNeighborhoodInfo {
			id,
			name: info.name,
			pickup_fee_cents: info.pickup_fee_cents,
		}),
	))
}

pub async fn delete_neighborhood(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(n::neighborhood.filter(n::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(
			StatusCode::NOT_FOUND,
			"neighborhood not found",
		));
	}
	Ok((StatusCode::ACCEPTED, "neighborhood deleted"))
}

pub async fn list_breeds(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiBreedInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlBreed> = db.load_select(br::breed).await?;
	Ok(Json(
		rows.into_iter()
			.map(|row| ApiBreedInfo {
				id: row.id,
				name: row.name,
				species: row.species,
			})
			.collect(),
	))
}

pub async fn new_breed(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<BreedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiBreedInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(br::breed)
				.values((br::name.eq(&info.name), br::species.eq(&info.species)))
				.returning(br::id),
		)
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(ApiBreedInfo {
			id,
			name: info.name,
			species: info.species,
		}),
	))
}

pub async fn update_breed(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<BreedConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiBreedInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(
			update(br::breed.filter(br::id.eq(id)))
				.set((br::name.eq(&info.name), br::species.eq(&info.species))),
		)
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "breed not found"));
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(ApiBreedInfo {
			id,
			name: info.name,
			species: info.species,
		}),
	))
}

pub async fn delete_breed(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db.execute(delete(br::breed.filter(br::id.eq(id)))).await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "breed not found"));
	}
	Ok((StatusCode::ACCEPTED, "breed deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::catalog::ApiNeighborhoodInfo;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_neighborhood_roundtrip() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/neighborhood",
				Some(&token),
				&json!({"name": "Centro", "pickup_fee_cents": 800}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let hood: ApiNeighborhoodInfo = read_json(response).await;

		let response = send(
			&router,
			json_request(
				"PUT",
				&format!("/api/neighborhood/{}", hood.id),
				Some(&token),
				&json!({"name": "Centro", "pickup_fee_cents": 1000}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::ACCEPTED);
		let updated: ApiNeighborhoodInfo = read_json(response).await;
		assert_eq!(updated.pickup_fee_cents, 1000);

		let response = send(
			&router,
			request(
				"DELETE",
				&format!("/api/neighborhood/{}", hood.id),
				Some(&token),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::ACCEPTED);

		let response = send(&router, request("GET", "/api/neighborhood", Some(&token))).await;
		let all: Vec<ApiNeighborhoodInfo> = read_json(response).await;
		assert!(all.is_empty());
	}
}
