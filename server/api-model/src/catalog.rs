use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiCategoryInfo {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiNeighborhoodInfo {
	pub id: i64,
	pub name: String,
	pub pickup_fee_cents: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct NeighborhoodConfigInfo {
	pub name: String,
	#[serde(default)]
	pub pickup_fee_cents: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiBreedInfo {
	pub id: i64,
	pub name: String,
	pub species: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BreedConfigInfo {
	pub name: String,
	pub species: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiPaymentMethodInfo {
	pub id: i64,
	pub name: String,
}

/// Creation/update payload for the single-field catalog entities.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct NamedConfigInfo {
	pub name: String,
}
