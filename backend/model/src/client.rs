/// Database identifier of a client.
pub type ClientRef = i64;

/// Database identifier of a pet owned by a client.
pub type PetRef = i64;
