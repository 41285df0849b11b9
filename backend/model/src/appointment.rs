use petshop_common_model::appointment::AppointmentStatus;

pub type AppointmentRef = i64;

/// Database representation of [AppointmentStatus].
///
/// Stored as a tiny unsigned column. Unknown values are decoded as canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SqlAppointmentStatus {
	Pending = 0,
	Confirmed = 1,
	Completed = 2,
	Canceled = 3,
}

impl From<i16> for SqlAppointmentStatus {
	fn from(value: i16) -> Self {
		match value {
			0 => Self::Pending,
			1 => Self::Confirmed,
			2 => Self::Completed,
			3 => Self::Canceled,
			_ => Self::Canceled,
		}
	}
}

impl SqlAppointmentStatus {
	pub fn into_common(self, message: Option<String>) -> AppointmentStatus {
		match self {
			SqlAppointmentStatus::Pending => AppointmentStatus::Pending,
			SqlAppointmentStatus::Confirmed => AppointmentStatus::Confirmed,
			SqlAppointmentStatus::Completed => AppointmentStatus::Completed,
			SqlAppointmentStatus::Canceled => AppointmentStatus::Canceled {
				reason: message.unwrap_or_default(),
			},
		}
	}
}

impl From<&AppointmentStatus> for SqlAppointmentStatus {
	fn from(value: &AppointmentStatus) -> Self {
		match value {
			AppointmentStatus::Pending => Self::Pending,
			AppointmentStatus::Confirmed => Self::Confirmed,
			AppointmentStatus::Completed => Self::Completed,
			AppointmentStatus::Canceled { .. } => Self::Canceled,
		}
	}
}
