use petshop_common_model::adoption::AdoptionStatus;

pub type AdoptionListingRef = i64;

/// Database representation of [AdoptionStatus].
///
/// Stored as a tiny unsigned column. Unknown values are decoded as reserved,
/// which keeps them off the public gallery without losing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SqlAdoptionStatus {
	Available = 0,
	Reserved = 1,
	Adopted = 2,
}

impl From<i16> for SqlAdoptionStatus {
	fn from(value: i16) -> Self {
		match value {
			0 => Self::Available,
			1 => Self::Reserved,
			2 => Self::Adopted,
			_ => Self::Reserved,
		}
	}
}

impl From<SqlAdoptionStatus> for AdoptionStatus {
	fn from(value: SqlAdoptionStatus) -> Self {
		match value {
			SqlAdoptionStatus::Available => Self::Available,
			SqlAdoptionStatus::Reserved => Self::Reserved,
			SqlAdoptionStatus::Adopted => Self::Adopted,
		}
	}
}

impl From<AdoptionStatus> for SqlAdoptionStatus {
	fn from(value: AdoptionStatus) -> Self {
		match value {
			AdoptionStatus::Available => Self::Available,
			AdoptionStatus::Reserved => Self::Reserved,
			AdoptionStatus::Adopted => Self::Adopted,
		}
	}
}
