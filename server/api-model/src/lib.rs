//! Wire types of the pet-shop HTTP API.
//!
//! Everything here is a plain serde struct; the canonical field naming is
//! snake_case, except for the privileged function payloads which keep
//! their historical camelCase contract.

pub mod adoption;
pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod functions;
pub mod payment;
pub mod pet;
pub mod product;
pub mod service;
pub mod user;
