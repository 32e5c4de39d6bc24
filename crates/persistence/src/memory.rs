//! In-memory row store for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::store::{RowStore, StoreError};

/// In-process [`RowStore`] holding one cell grid per sheet id.
///
/// Serves as the `memory` provider for local development and as the store
/// used by registry and API tests. Sheets spring into existence on first
/// write and read as empty before that. `fail_reads`/`fail_writes` inject
/// faults for degraded-path coverage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: RwLock<HashMap<String, Vec<Vec<String>>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of `sheet`.
    pub async fn seed(&self, sheet: &str, rows: Vec<Vec<String>>) {
        self.sheets.write().await.insert(sheet.to_string(), rows);
    }

    /// Snapshot of the current contents of `sheet`.
    pub async fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets
            .read()
            .await
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every subsequent read fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write and append fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

/// Extracts the 1-based row bounds of an A1-style range label.
///
/// `"Sheet1!A1:H1"` → `(1, Some(1))`, `"Sheet1!A2:H"` → `(2, None)`,
/// `"Sheet1!A:H"` → `(1, None)`.
fn row_bounds(range: &str) -> (usize, Option<usize>) {
    let cells = range.rsplit('!').next().unwrap_or(range);
    let mut endpoints = cells.splitn(2, ':');
    let start = endpoints.next().and_then(row_number).unwrap_or(1);
    let end = endpoints.next().and_then(row_number);
    (start, end)
}

fn row_number(endpoint: &str) -> Option<usize> {
    let digits: String = endpoint.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn read_range(
        &self,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }

        let sheets = self.sheets.read().await;
        let grid = match sheets.get(sheet) {
            Some(grid) => grid,
            None => return Ok(Vec::new()),
        };

        let (start, end) = row_bounds(range);
        let from = start.saturating_sub(1).min(grid.len());
        let to = end.map_or(grid.len(), |e| e.min(grid.len()));
        Ok(grid[from..to.max(from)].to_vec())
    }

    async fn write_range(
        &self,
        sheet: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }

        let mut sheets = self.sheets.write().await;
        let grid = sheets.entry(sheet.to_string()).or_default();

        let (start, _) = row_bounds(range);
        let from = start.saturating_sub(1);
        if grid.len() < from + rows.len() {
            grid.resize(from + rows.len(), Vec::new());
        }
        for (offset, row) in rows.into_iter().enumerate() {
            grid[from + offset] = row;
        }
        Ok(())
    }

    async fn append_row(
        &self,
        sheet: &str,
        _range: &str,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }

        let mut sheets = self.sheets.write().await;
        let grid = sheets.entry(sheet.to_string()).or_default();

        // Append lands after the last row with content, like the real
        // backend's table detection.
        while grid
            .last()
            .is_some_and(|last| last.iter().all(|cell| cell.trim().is_empty()))
        {
            grid.pop();
        }
        grid.push(row);
        Ok(())
    }
}
