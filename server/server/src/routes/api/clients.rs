use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::client::{ApiClientInfo, ClientConfigInfo};
use petshop_backend_model::{
	client::ClientRef,
	db::schema::{self, client::dsl as c},
};
use petshop_backend_service::{BackendServices, database::SqlConnRef, sql_now};
use petshop_common_model::cpf::Cpf;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::client)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiClientInfo {
	id: i64,
	name: String,
	phone: String,
	cpf: Option<String>,
	email: Option<String>,
	neighborhood: Option<i64>,
	created_at: time::PrimitiveDateTime,
}

impl From<SqlApiClientInfo> for ApiClientInfo {
	fn from(row: SqlApiClientInfo) -> Self {
		ApiClientInfo {
			id: row.id,
			name: row.name,
			phone: row.phone,
			cpf: row.cpf,
			email: row.email,
			neighborhood: row.neighborhood,
			created_at: row.created_at,
		}
	}
}

/// Normalizes a CPF to its canonical 11-digit form, rejecting invalid ones.
fn canonical_cpf(cpf: Option<&str>) -> ApiResult<Option<String>> {
	match cpf {
		None => Ok(None),
		Some(raw) => {
			let cpf = Cpf::parse(raw).map_err(|err| {
				ApiError::CustomString(StatusCode::BAD_REQUEST, format!("invalid CPF: {err}"))
			})?;
			Ok(Some(cpf.as_str().to_owned()))
		}
	}
}

async fn client_info(db: &mut SqlConnRef, id: ClientRef) -> ApiResult<Json<ApiClientInfo>> {
	let row: SqlApiClientInfo = db
		.load_one_select(c::client.filter(c::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

pub async fn list_clients(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiClientInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiClientInfo> = db.load_select(c::client).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_client(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<ClientRef>,
) -> ApiResult<Json<ApiClientInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiClientInfo> = db
		.load_one_select(c::client.filter(c::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "client not found")?;
	Ok(Json(row.into()))
}

pub async fn new_client(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<ClientConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiClientInfo>)> {
	let cpf = canonical_cpf(info.cpf.as_deref())?;
	let mut db = backend.database.get().await?;
	let id: ClientRef = db
		.get_result(
			insert_into(c::client)
				.values((
					c::name.eq(&info.name),
					c::phone.eq(&info.phone),
					c::cpf.eq(cpf),
					c::email.eq(info.email.as_deref()),
					c::neighborhood.eq(info.neighborhood),
					c::created_at.eq(sql_now()),
				))
				.returning(c::id),
		)
		.await?;

	Ok((StatusCode::CREATED, client_info(&mut db, id).await?))
}

pub async fn update_client(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<ClientRef>,
	Json(info): Json<ClientConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiClientInfo>)> {
	let cpf = canonical_cpf(info.cpf.as_deref())?;
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(c::client.filter(c::id.eq(id))).set((
			c::name.eq(&info.name),
			c::phone.eq(&info.phone),
			c::cpf.eq(cpf),
			c::email.eq(info.email.as_deref()),
			c::neighborhood.eq(info.neighborhood),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "client not found"));
	}

	Ok((StatusCode::ACCEPTED, client_info(&mut db, id).await?))
}

pub async fn delete_client(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<ClientRef>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(c::client.filter(c::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "client not found"));
	}
	Ok((StatusCode::ACCEPTED, "client deleted"))
}
