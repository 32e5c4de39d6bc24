//! External row-store abstraction.
//!
//! The registry's backing store is an externally-owned, key-ordered table
//! addressed through A1-style range labels (`"Sheet1!A1:H1"`) and
//! exchanging 2D arrays of string cells. No connection or lock is held on
//! it between requests.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a row store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Store request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Store transport error: {0}")]
    Transport(String),

    #[error("Malformed store response: {0}")]
    InvalidResponse(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// A spreadsheet-style table backend.
///
/// This trait is the seam where a backend offering an atomic
/// append-if-absent primitive would slot in. Neither current backend has
/// one, so duplicate checking stays read-then-append (see [`crate::registry`]).
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Reads the cells in `range`. Rows may be ragged; trailing empty cells
    /// are simply absent.
    async fn read_range(&self, sheet: &str, range: &str)
        -> Result<Vec<Vec<String>>, StoreError>;

    /// Overwrites the cells in `range`.
    async fn write_range(
        &self,
        sheet: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError>;

    /// Appends one row after the existing content covered by `range`.
    /// The append either fully commits or has no effect; there are no
    /// partial-row writes.
    async fn append_row(&self, sheet: &str, range: &str, row: Vec<String>)
        -> Result<(), StoreError>;
}
