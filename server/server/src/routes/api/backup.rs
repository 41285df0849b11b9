use axum::{
	Json,
	body::Bytes,
	extract::{Query, State},
	http::StatusCode,
};
use petshop_api_model::functions::UploadResponse;
use petshop_backend_service::{
	BackendServices,
	backup::{BACKUP_TABLES, Snapshot},
};
use serde::Deserialize;

use super::{auth::AdminUser, error::{ApiError, ApiResult}};

#[derive(Debug, Deserialize)]
pub struct ExportParams {
	/// Comma-separated table names; all backed-up tables when absent.
	tables: Option<String>,
}

pub async fn list_tables(_admin: AdminUser) -> Json<&'static [&'static str]> {
	Json(BACKUP_TABLES)
}

pub async fn export(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	Query(params): Query<ExportParams>,
) -> ApiResult<Json<Snapshot>> {
	let tables: Vec<String> = match &params.tables {
		Some(list) => list
			.split(',')
			.filter(|name| !name.is_empty())
			.map(str::to_owned)
			.collect(),
		None => BACKUP_TABLES.iter().map(|name| (*name).to_owned()).collect(),
	};
	Ok(Json(backend.backup.export(&tables).await?))
}

/// Exports the selected tables straight into object storage and returns
/// the snapshot path.
pub async fn export_to_storage(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	Query(params): Query<ExportParams>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
	let tables: Vec<String> = match &params.tables {
		Some(list) => list
			.split(',')
			.filter(|name| !name.is_empty())
			.map(str::to_owned)
			.collect(),
		None => BACKUP_TABLES.iter().map(|name| (*name).to_owned()).collect(),
	};
	let path = backend.backup.export_to_storage(&tables).await?;
	Ok((StatusCode::CREATED, Json(UploadResponse { path })))
}

/// Stores a client-supplied snapshot for a later restore call.
pub async fn upload(
	_admin: AdminUser,
	State(backend): State<BackendServices>,
	body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
	// parse up front so a garbage file is rejected before it is stored
	if let Err(err) = serde_json::from_slice::<Snapshot>(&body) {
		return Err(ApiError::CustomString(
			StatusCode::BAD_REQUEST,
			format!("malformed snapshot: {err}"),
		));
	}
	let path = backend.storage.put("backup", "json", &body).await?;
	Ok((StatusCode::CREATED, Json(UploadResponse { path })))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use serde_json::{Value, json};

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_export_is_admin_only() {
		let (router, _backend) = test_router().await;
		let response = send(&router, request("GET", "/api/backup/export", None)).await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_export_selected_tables() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/api/client",
				Some(&token),
				&json!({
					"name": "Bia",
					"phone": "+55 11 90000-0004",
					"cpf": null,
					"email": null,
					"neighborhood": null,
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);

		let response = send(
			&router,
			request("GET", "/api/backup/export?tables=client,pet", Some(&token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		let snapshot: Value = read_json(response).await;
		assert_eq!(snapshot["client"].as_array().unwrap().len(), 1);
		assert_eq!(snapshot["pet"].as_array().unwrap().len(), 0);

		// unknown table names are rejected up front
		let response = send(
			&router,
			request("GET", "/api/backup/export?tables=sessions", Some(&token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_upload_rejects_garbage() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			raw_request("POST", "/api/backup/upload", Some(&token), b"not json".to_vec()),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
