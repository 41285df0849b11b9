/// Database identifier of a staff user account.
pub type UserRef = i64;
