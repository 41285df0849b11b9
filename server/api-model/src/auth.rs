use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiAuthUser {
	pub id: i64,
	pub email: String,
	pub display_name: String,
	pub is_admin: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiSession {
	pub token: String,
	pub expires_at: PrimitiveDateTime,
	pub user: ApiAuthUser,
}
