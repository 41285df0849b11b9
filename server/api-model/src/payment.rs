use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ApiPaymentInfo {
	pub id: i64,
	pub appointment: i64,
	pub method: i64,
	pub amount_cents: i64,
	pub paid_at: PrimitiveDateTime,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PaymentConfigInfo {
	pub appointment: i64,
	pub method: i64,
	pub amount_cents: i64,
}
