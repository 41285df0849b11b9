//! Staff account management. Everything here needs the admin flag.

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable};
use petshop_api_model::user::{ApiUserInfo, UserConfigInfo, UserUpdateInfo};
use petshop_backend_model::{
	db::schema::{self, users::dsl as u},
	user::UserRef,
};
use petshop_backend_service::{BackendServices, auth::NewUserInfo, database::SqlConnRef};

use super::{
	auth::AdminUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiUserInfo {
	id: i64,
	email: String,
	display_name: String,
	is_admin: bool,
	created_at: time::PrimitiveDateTime,
}

impl From<SqlApiUserInfo> for ApiUserInfo {
	fn from(row: SqlApiUserInfo) -> Self {
		ApiUserInfo {
			id: row.id,
			email: row.email,
			display_name: row.display_name,
			is_admin: row.is_admin,
			created_at: row.created_at,
		}
	}
}

async fn user_info(db: &mut SqlConnRef, id: UserRef) -> ApiResult<Json<ApiUserInfo>> {
	let row: SqlApiUserInfo = db
		.load_one_select(u::users.filter(u::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

pub async fn list_users(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiUserInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiUserInfo> = db.load_select(u::users).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_user(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	Path(id): Path<UserRef>,
) -> ApiResult<Json<ApiUserInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiUserInfo> = db
		.load_one_select(u::users.filter(u::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "user not found")?;
	Ok(Json(row.into()))
}

pub async fn new_user(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	Json(info): Json<UserConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiUserInfo>)> {
	let created = backend
		.auth
		.create_user(&NewUserInfo {
			email: info.email,
			display_name: info.display_name,
			password: info.password,
			is_admin: info.is_admin,
		})
		.await?;

	let mut db = backend.database.get().await?;
	Ok((StatusCode::CREATED, user_info(&mut db, created.id).await?))
}

pub async fn update_user(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	Path(id): Path<UserRef>,
	Json(info): Json<UserUpdateInfo>,
) -> ApiResult<(StatusCode, Json<ApiUserInfo>)> {
	if info == UserUpdateInfo::default() {
		return Err(ApiError::CustomRef(
			StatusCode::BAD_REQUEST,
			"no fields to update",
		));
	}
	backend
		.auth
		.update_user(
			id,
			info.display_name.as_deref(),
			info.password.as_deref(),
			info.is_admin,
		)
		.await?;

	let mut db = backend.database.get().await?;
	Ok((StatusCode::ACCEPTED, user_info(&mut db, id).await?))
}

pub async fn delete_user(
	admin: AdminUser,
	State(backend): State<BackendServices>,
	Path(id): Path<UserRef>,
) -> ApiResult<(StatusCode, &'static str)> {
	if admin.info.id == id {
		return Err(ApiError::CustomRef(
			StatusCode::BAD_REQUEST,
			"cannot delete the signed-in account",
		));
	}
	backend.auth.delete_user(id).await?;
	Ok((StatusCode::ACCEPTED, "user deleted"))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::user::ApiUserInfo;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_non_admin_is_forbidden() {
		let (router, backend) = test_router().await;
		backend
			.auth
			.create_user(&petshop_backend_service::auth::NewUserInfo {
				email: "staff@petshop.test".to_owned(),
				display_name: "Staff".to_owned(),
				password: "s3cret".to_owned(),
				is_admin: false,
			})
			.await
			.unwrap();
		let session = backend
			.auth
			.sign_in("staff@petshop.test", "s3cret")
			.await
			.unwrap();

		let response = send(
			&router,
			request("GET", "/api/user", Some(&session.token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn test_create_update_delete() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/user",
				Some(&token),
				&json!({
					"email": "staff@petshop.test",
					"password": "s3cret",
					"display_name": "Staff",
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let user: ApiUserInfo = read_json(response).await;
		assert!(!user.is_admin);

		// duplicate email is a conflict
		let response = send(
			&router,
			json_request(
				"POST",
				"/api/user",
				Some(&token),
				&json!({
					"email": "staff@petshop.test",
					"password": "other",
					"display_name": "Staff 2",
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CONFLICT);

		let response = send(
			&router,
			json_request(
				"PATCH",
				&format!("/api/user/{}", user.id),
				Some(&token),
				&json!({"is_admin": true}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::ACCEPTED);
		let updated: ApiUserInfo = read_json(response).await;
		assert!(updated.is_admin);

		let response = send(
			&router,
			request("DELETE", &format!("/api/user/{}", user.id), Some(&token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::ACCEPTED);
	}

	#[tokio::test]
	async fn test_cannot_delete_self() {
		let (router, backend) = test_router().await;
		let token = admin_token(&router).await;
		let me = backend.auth.authenticate(&token).await.unwrap().unwrap();

		let response = send(
			&router,
			request("DELETE", &format!("/api/user/{}", me.id), Some(&token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
