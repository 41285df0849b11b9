//! Database models for the pet-shop backend.
//!
//! ## Primary Key Uniqueness
//! All primary keys should be as unique as possible,
//! in order to avoid conflicts with all historical IDs.

pub mod adoption;
pub mod appointment;
pub mod client;
pub mod db;
pub mod user;
