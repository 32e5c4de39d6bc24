//! Orchestration services.

pub mod registration;

pub use registration::{RegistrationOutcome, RegistrationService};
