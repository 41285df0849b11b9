use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiProductInfo {
	pub id: i64,
	pub name: String,
	pub category: Option<i64>,
	pub supplier: Option<i64>,
	pub price_cents: i64,
	pub stock: i32,
	pub min_stock: i32,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ProductConfigInfo {
	pub name: String,
	pub category: Option<i64>,
	pub supplier: Option<i64>,
	pub price_cents: i64,
	#[serde(default)]
	pub stock: i32,
	#[serde(default)]
	pub min_stock: i32,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiSupplierInfo {
	pub id: i64,
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SupplierConfigInfo {
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
}
