//! Persistence layer for the Guestlist backend.
//!
//! This crate contains:
//! - The external row-store abstraction and its backends
//! - The guest registry (header provisioning, reads, appends, dedup)
//! - Store call metrics

pub mod memory;
pub mod metrics;
pub mod registry;
pub mod sheets;
pub mod store;

pub use memory::MemoryStore;
pub use registry::{is_duplicate, GuestRegistry};
pub use sheets::{SheetsConfig, SheetsStore};
pub use store::{RowStore, StoreError};
