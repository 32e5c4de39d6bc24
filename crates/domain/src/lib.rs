//! Domain layer for the Guestlist backend.
//!
//! This crate contains:
//! - Domain models (RegistrationRecord, EventConfig)
//! - Request/response types for the registry surface

pub mod models;
