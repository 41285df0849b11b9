//! Domain types shared between the pet-shop backend and its API surface.

pub mod adoption;
pub mod appointment;
pub mod cpf;
