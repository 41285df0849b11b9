use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::product::{
	ApiProductInfo, ApiSupplierInfo, ProductConfigInfo, SupplierConfigInfo,
};
use petshop_backend_model::db::schema::{self, product::dsl as pr, supplier::dsl as sup};
use petshop_backend_service::{BackendServices, database::SqlConnRef};

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiProductInfo {
	id: i64,
	name: String,
	category: Option<i64>,
	supplier: Option<i64>,
	price_cents: i64,
	stock: i32,
	min_stock: i32,
}

impl From<SqlApiProductInfo> for ApiProductInfo {
	fn from(row: SqlApiProductInfo) -> Self {
		ApiProductInfo {
			id: row.id,
			name: row.name,
			category: row.category,
			supplier: row.supplier,
			price_cents: row.price_cents,
			stock: row.stock,
			min_stock: row.min_stock,
		}
	}
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::supplier)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiSupplierInfo {
	id: i64,
	name: String,
	phone: Option<String>,
	email: Option<String>,
}

impl From<SqlApiSupplierInfo> for ApiSupplierInfo {
	fn from(row: SqlApiSupplierInfo) -> Self {
		ApiSupplierInfo {
			id: row.id,
			name: row.name,
			phone: row.phone,
			email: row.email,
		}
	}
}

async fn product_info(db: &mut SqlConnRef, id: i64) -> ApiResult<Json<ApiProductInfo>> {
	let row: SqlApiProductInfo = db
		.load_one_select(pr::product.filter(pr::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

pub async fn list_products(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiProductInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiProductInfo> = db.load_select(pr::product).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_product(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<Json<ApiProductInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiProductInfo> = db
		.load_one_select(pr::product.filter(pr::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "product not found")?;
	Ok(Json(row.into()))
}

pub async fn new_product(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<ProductConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiProductInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(pr::product)
				.values((
					pr::name.eq(&info.name),
					pr::category.eq(info.category),
					pr::supplier.eq(info.supplier),
					pr::price_cents.eq(info.price_cents),
					pr::stock.eq(info.stock),
					pr::min_stock.eq(info.min_stock),
				))
				.returning(pr::id),
		)
		.await?;

	Ok((StatusCode::CREATED, product_info(&mut db, id).await?))
}

pub async fn update_product(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<ProductConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiProductInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(pr::product.filter(pr::id.eq(id))).set((
			pr::name.eq(&info.name),
			pr::category.eq(info.category),
			pr::supplier.eq(info.supplier),
			pr::price_cents.eq(info.price_cents),
			pr::stock.eq(info.stock),
			pr::min_stock.eq(info.min_stock),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "product not found"));
	}

	Ok((StatusCode::ACCEPTED, product_info(&mut db, id).await?))
}

pub async fn delete_product(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(pr::product.filter(pr::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "product not found"));
	}
	Ok((StatusCode::ACCEPTED, "product deleted"))
}

pub async fn list_suppliers(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiSupplierInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiSupplierInfo> = db.load_select(sup::supplier).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_supplier(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<Json<ApiSupplierInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiSupplierInfo> = db
		.load_one_select(sup::supplier.filter(sup::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "supplier not found")?;
	Ok(Json(row.into()))
}

pub async fn new_supplier(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<SupplierConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiSupplierInfo>)> {
	let mut db = backend.database.get().await?;
	let id: i64 = db
		.get_result(
			insert_into(sup::supplier)
				.values((
					sup::name.eq(&info.name),
					sup::phone.eq(info.phone.as_deref()),
					sup::email.eq(info.email.as_deref()),
				))
				.returning(sup::id),
		)
		.await?;
	let row: SqlApiSupplierInfo = db
		.load_one_select(sup::supplier.filter(sup::id.eq(id)).limit(1))
		.await?;

	Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_supplier(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
	Json(info): Json<SupplierConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiSupplierInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(sup::supplier.filter(sup::id.eq(id))).set((
			sup::name.eq(&info.name),
			sup::phone.eq(info.phone.as_deref()),
			sup::email.eq(info.email.as_deref()),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "supplier not found"));
	}
	let row: SqlApiSupplierInfo = db
		.load_one_select(sup::supplier.filter(sup::id.eq(id)).limit(1))
		.await?;

	Ok((StatusCode::ACCEPTED, Json(row.into())))
}

pub async fn delete_supplier(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(sup::supplier.filter(sup::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "supplier not found"));
	}
	Ok((StatusCode::ACCEPTED, "supplier deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::product::ApiProductInfo;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_product_stock_defaults() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/product",
				Some(&token),
				&json!({
					"name": "Dog shampoo",
					"category": null,
					"supplier": null,
					"price_cents": 2990,
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let product: ApiProductInfo = read_json(response).await;
		assert_eq!(product.stock, 0);
		assert_eq!(product.min_stock, 0);
	}
}
