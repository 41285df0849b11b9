use serde::{Deserialize, Serialize};

/// Status of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppointmentStatus {
	/// Status for appointments requested but not yet confirmed by staff.
	Pending,
	/// Status for appointments confirmed by staff.
	Confirmed,
	/// Status for appointments whose services were delivered.
	///
	/// Only completed appointments count towards revenue and
	/// attendance reports.
	Completed,
	/// Status for appointments called off by either side.
	Canceled { reason: String },
}
