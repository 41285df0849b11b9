use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiPetInfo {
	pub id: i64,
	pub client: i64,
	pub name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub notes: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PetConfigInfo {
	pub client: i64,
	pub name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub notes: Option<String>,
}
