use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiClientInfo {
	pub id: i64,
	pub name: String,
	pub phone: String,
	pub cpf: Option<String>,
	pub email: Option<String>,
	pub neighborhood: Option<i64>,
	pub created_at: PrimitiveDateTime,
}

/// Full client payload, used for both create and replace.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ClientConfigInfo {
	pub name: String,
	pub phone: String,
	pub cpf: Option<String>,
	pub email: Option<String>,
	pub neighborhood: Option<i64>,
}
