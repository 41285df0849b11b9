use petshop_common_model::adoption::AdoptionStatus;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiAdoptionInfo {
	pub id: i64,
	pub pet_name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub age_months: Option<i32>,
	pub description: Option<String>,
	/// Storage key of the listing photo, servable via the photo endpoint.
	pub photo: Option<String>,
	pub status: AdoptionStatus,
	pub created_at: PrimitiveDateTime,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct AdoptionConfigInfo {
	pub pet_name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub age_months: Option<i32>,
	pub description: Option<String>,
	#[serde(default = "default_status")]
	pub status: AdoptionStatus,
}

fn default_status() -> AdoptionStatus {
	AdoptionStatus::Available
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiStoryInfo {
	pub id: i64,
	pub listing: i64,
	pub title: String,
	pub body: String,
	pub published_at: PrimitiveDateTime,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct StoryConfigInfo {
	pub listing: i64,
	pub title: String,
	pub body: String,
}
