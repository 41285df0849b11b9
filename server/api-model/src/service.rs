use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiServiceInfo {
	pub id: i64,
	pub name: String,
	pub description: Option<String>,
	pub price_cents: i64,
	pub duration_min: i32,
	pub active: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ServiceConfigInfo {
	pub name: String,
	pub description: Option<String>,
	pub price_cents: i64,
	pub duration_min: i32,
	#[serde(default = "default_active")]
	pub active: bool,
}

fn default_active() -> bool {
	true
}
