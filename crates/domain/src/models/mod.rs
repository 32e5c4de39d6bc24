//! Domain models for the Guestlist backend.

pub mod event;
pub mod registration;

pub use event::EventConfig;
pub use registration::{
    ListGuestsResponse, RegisterGuestRequest, RegisterGuestResponse, RegistrationRecord,
};
