//! HTTP route handlers.

pub mod events;
pub mod guests;
pub mod health;
pub mod invites;
