use petshop_common_model::appointment::AppointmentStatus;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiAppointmentInfo {
	pub id: i64,
	pub client: i64,
	pub scheduled_date: Date,
	pub time_slot: String,
	pub status: AppointmentStatus,
	pub pickup: bool,
	pub neighborhood: Option<i64>,
	pub total_cents: i64,
	pub created_at: PrimitiveDateTime,
	pub items: Vec<ApiAppointmentItemInfo>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiAppointmentItemInfo {
	pub id: i64,
	pub pet: i64,
	pub service: i64,
	pub price_cents: i64,
}

/// Staff-created appointment for an existing client and pets. The total
/// is computed server-side from current service prices and the pickup fee.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct AppointmentConfigInfo {
	pub client: i64,
	pub scheduled_date: Date,
	pub time_slot: String,
	#[serde(default)]
	pub pickup: bool,
	pub neighborhood: Option<i64>,
	pub items: Vec<AppointmentItemConfigInfo>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct AppointmentItemConfigInfo {
	pub pet: i64,
	pub service: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct AppointmentStatusInfo {
	pub status: AppointmentStatus,
}
