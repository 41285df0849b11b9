use serde::{Deserialize, Serialize};

/// Status of an adoption listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
	/// The animal is published in the gallery and can be adopted.
	Available,
	/// An adoption is in progress; the listing is hidden from the
	/// public gallery but kept for staff.
	Reserved,
	/// The animal found a home.
	Adopted,
}
