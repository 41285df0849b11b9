use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::pet::{ApiPetInfo, PetConfigInfo};
use petshop_backend_model::{
	client::{ClientRef, PetRef},
	db::schema::{self, client::dsl as c, pet::dsl as p},
};
use petshop_backend_service::{BackendServices, database::SqlConnRef};
use serde::Deserialize;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::pet)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiPetInfo {
	id: i64,
	client: i64,
	name: String,
	species: String,
	breed: Option<i64>,
	notes: Option<String>,
}

impl From<SqlApiPetInfo> for ApiPetInfo {
	fn from(row: SqlApiPetInfo) -> Self {
		ApiPetInfo {
			id: row.id,
			client: row.client,
			name: row.name,
			species: row.species,
			breed: row.breed,
			notes: row.notes,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct PetListParams {
	client: Option<ClientRef>,
}

async fn pet_info(db: &mut SqlConnRef, id: PetRef) -> ApiResult<Json<ApiPetInfo>> {
	let row: SqlApiPetInfo = db
		.load_one_select(p::pet.filter(p::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

async fn check_client(db: &mut SqlConnRef, id: ClientRef) -> ApiResult<()> {
	let exists: Option<ClientRef> = db
		.get_result(c::client.filter(c::id.eq(id)).select(c::id).limit(1))
		.await
		.optional()?;
	exists
		.map(|_| ())
		.or_api_error(StatusCode::BAD_REQUEST, "unknown client")
}

pub async fn list_pets(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Query(params): Query<PetListParams>,
) -> ApiResult<Json<Vec<ApiPetInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiPetInfo> = match params.client {
		Some(client) => db.load_select(p::pet.filter(p::client.eq(client))).await?,
		None => db.load_select(p::pet).await?,
	};
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_pet(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<PetRef>,
) -> ApiResult<Json<ApiPetInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiPetInfo> = db
		.load_one_select(p::pet.filter(p::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "pet not found")?;
	Ok(Json(row.into()))
}

pub async fn new_pet(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<PetConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiPetInfo>)> {
	let mut db = backend.database.get().await?;
	check_client(&mut db, info.client).await?;
	let id: PetRef = db
		.get_result(
			insert_into(p::pet)
				.values((
					p::client.eq(info.client),
					p::name.eq(&info.name),
					p::species.eq(&info.species),
					p::breed.eq(info.breed),
					p::notes.eq(info.notes.as_deref()),
				))
				.returning(p::id),
		)
		.await?;

	Ok((StatusCode::CREATED, pet_info(&mut db, id).await?))
}

pub async fn update_pet(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<PetRef>,
	Json(info): Json<PetConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiPetInfo>)> {
	let mut db = backend.database.get().await?;
	check_client(&mut db, info.client).await?;
	let rows = db
		.execute(update(p::pet.filter(p::id.eq(id))).set((
			p::client.eq(info.client),
			p::name.eq(&info.name),
			p::species.eq(&info.species),
			p::breed.eq(info.breed),
			p::notes.eq(info.notes.as_deref()),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "pet not found"));
	}

	Ok((StatusCode::ACCEPTED, pet_info(&mut db, id).await?))
}

pub async fn delete_pet(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<PetRef>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db.execute(delete(p::pet.filter(p::id.eq(id)))).await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "pet not found"));
	}
	Ok((StatusCode::ACCEPTED, "pet deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::{client::ApiClientInfo, pet::ApiPetInfo};
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_pet_belongs_to_client() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/client",
				Some(&token),
				&json!({
					"name": "Ana",
					"phone": "+55 11 90000-0002",
					"cpf": null,
					"email": null,
					"neighborhood": null,
				}),
			),
		)
		.await;
		let client: ApiClientInfo = read_json(response).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/pet",
				Some(&token),
				&json!({
					"client": client.id,
					"name": "Rex",
					"species": "dog",
					"breed": null,
					"notes": "afraid of dryers",
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let pet: ApiPetInfo = read_json(response).await;
		assert_eq!(pet.client, client.id);

		// filtered listing only returns this client's pets
		let response = send(
			&router,
			request(
				"GET",
				&format!("/api/pet?client={}", client.id),
				Some(&token),
			),
		)
		.await;
		let pets: Vec<ApiPetInfo> = read_json(response).await;
		assert_eq!(pets.len(), 1);

		// unknown owner is rejected
		let response = send(
			&router,
			json_request(
				"POST",
				"/api/pet",
				Some(&token),
				&json!({
					"client": 9999,
					"name": "Mia",
					"species": "cat",
					"breed": null,
					"notes": null,
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
