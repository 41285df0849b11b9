//! Payloads for the privileged function endpoints. These keep the
//! camelCase field names the web clients already send.

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct DeleteUserRequest {
	#[serde(rename = "userId")]
	pub user_id: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
	pub status: String,
	#[serde(rename = "userId")]
	pub user_id: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CpfCheckRequest {
	pub cpf: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CpfCheckResponse {
	#[serde(rename = "isValid")]
	pub is_valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub formatted: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Returned by the snapshot upload endpoint; the `path` feeds
/// [`RestoreRequest`].
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
	pub path: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct RestoreRequest {
	pub path: String,
	pub password: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
	pub status: String,
	pub tables: usize,
	pub rows: usize,
}
