//! The privileged function endpoints: account deletion, CPF validation
//! and backup restore. Their payloads keep the camelCase contract of the
//! original web clients.

use axum::{Json, extract::State, http::StatusCode};
use petshop_api_model::functions::{
	CpfCheckRequest, CpfCheckResponse, DeleteUserRequest, DeleteUserResponse, RestoreRequest,
	RestoreResponse,
};
use petshop_backend_service::{BackendError, BackendServices};
use petshop_common_model::cpf::Cpf;
use tracing::warn;

use super::{
	auth::{AdminUser, AuthUser},
	error::{ApiError, ApiResult},
};

pub async fn delete_user(
	admin: AdminUser,
	State(backend): State<BackendServices>,
	Json(request): Json<DeleteUserRequest>,
) -> ApiResult<Json<DeleteUserResponse>> {
	if admin.info.id == request.user_id {
		return Err(ApiError::CustomRef(
			StatusCode::BAD_REQUEST,
			"cannot delete the signed-in account",
		));
	}
	backend.auth.delete_user(request.user_id).await?;
	Ok(Json(DeleteUserResponse {
		status: "ok".to_owned(),
		user_id: request.user_id,
	}))
}

pub async fn validate_cpf(
	_user: AuthUser,
	Json(request): Json<CpfCheckRequest>,
) -> Json<CpfCheckResponse> {
	Json(match Cpf::parse(&request.cpf) {
		Ok(cpf) => CpfCheckResponse {
			is_valid: true,
			formatted: Some(cpf.formatted()),
			message: None,
		},
		Err(err) => CpfCheckResponse {
			is_valid: false,
			formatted: None,
			message: Some(err.to_string()),
		},
	})
}

/// Replaces the live tables with a previously uploaded snapshot.
///
/// Runs entirely inside one transaction; any failure leaves the database
/// untouched. The caller must replay their password even with a valid
/// session.
pub async fn restore_backup(
	admin: AdminUser,
	State(backend): State<BackendServices>,
	Json(request): Json<RestoreRequest>,
) -> ApiResult<Json<RestoreResponse>> {
	if !backend
		.auth
		.verify_password(admin.info.id, &request.password)
		.await?
	{
		return Err(ApiError::CustomRef(
			StatusCode::FORBIDDEN,
			"password confirmation failed",
		));
	}

	warn!(user = admin.info.id, path = request.path, "restoring backup");
	let summary = match backend.backup.restore_from_storage(&request.path).await {
		Ok(summary) => summary,
		// a bad path or snapshot is the caller's problem; everything
		// else stays a server error
		Err(
			err @ (BackendError::StorageError(_)
			| BackendError::BackupError(_)
			| BackendError::JsonError(_)),
		) => {
			return Err(ApiError::CustomString(
				StatusCode::BAD_REQUEST,
				err.to_string(),
			));
		}
		Err(err) => return Err(err.into()),
	};

	Ok(Json(RestoreResponse {
		status: "ok".to_owned(),
		tables: summary.tables,
		rows: summary.rows,
	}))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::functions::{RestoreResponse, UploadResponse};
	use petshop_backend_service::auth::NewUserInfo;
	use serde_json::{Value, json};

	use crate::routes::test::*;

	async fn staff_token(backend: &petshop_backend_service::BackendServices) -> String {
		backend
			.auth
			.create_user(&NewUserInfo {
				email: "staff@petshop.test".to_owned(),
				display_name: "Staff".to_owned(),
				password: "s3cret".to_owned(),
				is_admin: false,
			})
			.await
			.unwrap();
		backend
			.auth
			.sign_in("staff@petshop.test", "s3cret")
			.await
			.unwrap()
			.token
	}

	#[tokio::test]
	async fn test_validate_cpf() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		for (cpf, valid) in [
			("529.982.247-25", true),
			("11144477735", true),
			("11111111111", false),
			("123", false),
			("52998224724", false),
		] {
			let response = send(
				&router,
				json_request(
					"POST",
					"/api/functions/validate-cpf",
					Some(&token),
					&json!({"cpf": cpf}),
				),
			)
			.await;
			assert_eq!(response.status(), StatusCode::OK);
			let check: Value = read_json(response).await;
			assert_eq!(check["isValid"], valid, "cpf {cpf}");
		}
	}

	#[tokio::test]
	async fn test_delete_user_function() {
		let (router, backend) = test_router().await;
		let token = admin_token(&router).await;
		let staff = backend
			.auth
			.create_user(&NewUserInfo {
				email: "staff@petshop.test".to_owned(),
				display_name: "Staff".to_owned(),
				password: "s3cret".to_owned(),
				is_admin: false,
			})
			.await
			.unwrap();

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/delete-user",
				Some(&token),
				&json!({"userId": staff.id}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		let result: Value = read_json(response).await;
		assert_eq!(result["status"], "ok");
		assert_eq!(result["userId"], staff.id);

		// gone now
		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/delete-user",
				Some(&token),
				&json!({"userId": staff.id}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_restore_requires_token() {
		let (router, _backend) = test_router().await;
		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				None,
				&json!({"path": "backup/x.json", "password": "hunter2"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				Some("deadbeef"),
				&json!({"path": "backup/x.json", "password": "hunter2"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_restore_requires_admin() {
		let (router, backend) = test_router().await;
		let token = staff_token(&backend).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				Some(&token),
				&json!({"path": "backup/x.json", "password": "s3cret"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn test_restore_requires_password_confirmation() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				Some(&token),
				&json!({"path": "backup/x.json", "password": "wrong"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::FORBIDDEN);
	}

	#[tokio::test]
	async fn test_restore_unknown_path() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				Some(&token),
				&json!({"path": "backup/missing.json", "password": "hunter2"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_restore_roundtrip() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		// a small single-table snapshot
		let snapshot = json!({
			"neighborhood": [
				{"id": 1, "name": "Centro", "pickup_fee_cents": 800},
				{"id": 2, "name": "Jardins", "pickup_fee_cents": 1200},
				{"id": 5, "name": "Vila Nova", "pickup_fee_cents": 0},
			],
		});
		let response = send(
			&router,
			raw_request(
				"POST",
				"/api/backup/upload",
				Some(&token),
				serde_json::to_vec(&snapshot).unwrap(),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let upload: UploadResponse = read_json(response).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/functions/restore-backup",
				Some(&token),
				&json!({"path": upload.path, "password": "hunter2"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		let result: RestoreResponse = read_json(response).await;
		assert_eq!(result.status, "ok");
		assert_eq!(result.tables, 1);
		assert_eq!(result.rows, 3);

		// restored rows keep their explicit ids
		let response = send(&router, request("GET", "/api/neighborhood", Some(&token))).await;
		let rows: Value = read_json(response).await;
		let ids: Vec<i64> = rows
			.as_array()
			.unwrap()
			.iter()
			.map(|row| row["id"].as_i64().unwrap())
			.collect();
		assert_eq!(ids, [1, 2, 5]);
	}
}
