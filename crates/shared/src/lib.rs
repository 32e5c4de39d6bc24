//! Shared utilities and common types for the Guestlist backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Invite token encoding and decoding
//! - Referral slug derivation
//! - Phone number normalization
//! - Common validation logic

pub mod invite_token;
pub mod phone;
pub mod referral;
pub mod validation;
