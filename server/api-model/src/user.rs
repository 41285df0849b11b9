use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiUserInfo {
	pub id: i64,
	pub email: String,
	pub display_name: String,
	pub is_admin: bool,
	pub created_at: PrimitiveDateTime,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct UserConfigInfo {
	pub email: String,
	pub password: String,
	pub display_name: String,
	#[serde(default)]
	pub is_admin: bool,
}

/// Partial account update; absent fields stay unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateInfo {
	pub display_name: Option<String>,
	pub password: Option<String>,
	pub is_admin: Option<bool>,
}
