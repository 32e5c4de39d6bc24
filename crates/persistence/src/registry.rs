//! Guest registry over an external row store.
//!
//! One registry instance binds a store backend to one event's sheet.
//!
//! The duplicate check is read-then-append with no transaction: two
//! concurrent registrations for the same phone can both pass the check and
//! both land as rows. The backing store offers no read-modify-write
//! primitive, and expected traffic is human-paced form submissions; callers
//! needing a hard guarantee must hold an external lock around
//! [`GuestRegistry::read_all`] + [`GuestRegistry::append`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use domain::models::RegistrationRecord;
use shared::phone;

use crate::store::{RowStore, StoreError};

/// Canonical header row, provisioned lazily before the first data row.
pub const HEADER: [&str; 8] = [
    "Inviter Name",
    "First Name",
    "Last Name",
    "Phone",
    "Country Code",
    "Email",
    "Event Name",
    "Timestamp",
];

const HEADER_RANGE: &str = "Sheet1!A1:H1";
const FULL_RANGE: &str = "Sheet1!A:H";
const DATA_RANGE: &str = "Sheet1!A2:H";

/// Registry of registrations for one event.
#[derive(Clone)]
pub struct GuestRegistry {
    store: Arc<dyn RowStore>,
    sheet: String,
}

impl GuestRegistry {
    /// Creates a registry over `sheet` in the given store.
    pub fn new(store: Arc<dyn RowStore>, sheet: impl Into<String>) -> Self {
        Self {
            store,
            sheet: sheet.into(),
        }
    }

    /// Returns the sheet this registry is bound to.
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Provisions the canonical header if row 1 does not already carry one.
    ///
    /// Idempotent: detection is a case-insensitive "inviter" substring check
    /// on the first cell of row 1. A row 1 that fails the check is
    /// overwritten with the header.
    pub async fn ensure_header(&self) -> Result<(), StoreError> {
        // A failed probe counts as "no header": rewriting an existing header
        // is content-identical, and a registration must not die on a
        // transient read when the subsequent write can still land.
        if self.header_present().await.unwrap_or(false) {
            return Ok(());
        }

        let header = HEADER.iter().map(|cell| cell.to_string()).collect();
        self.store
            .write_range(&self.sheet, HEADER_RANGE, vec![header])
            .await
    }

    async fn header_present(&self) -> Result<bool, StoreError> {
        let rows = self.store.read_range(&self.sheet, HEADER_RANGE).await?;
        Ok(is_header_row(&rows))
    }

    /// Reads every registration currently in the sheet.
    ///
    /// A failed read degrades to an empty list: duplicate detection goes
    /// blind, but registration stays available. The warning is the
    /// operator's signal that dedup ran degraded.
    pub async fn read_all(&self) -> Vec<RegistrationRecord> {
        match self.try_read_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    sheet = %self.sheet,
                    error = %err,
                    "Registry read failed; treating registry as empty for dedup"
                );
                Vec::new()
            }
        }
    }

    async fn try_read_all(&self) -> Result<Vec<RegistrationRecord>, StoreError> {
        // Data starts at row 2 behind a header; registries that predate
        // header provisioning keep their rows from row 1.
        let range = if self.header_present().await? {
            DATA_RANGE
        } else {
            FULL_RANGE
        };
        let rows = self.store.read_range(&self.sheet, range).await?;

        Ok(rows
            .iter()
            .filter(|row| has_content(row))
            .map(|row| record_from_row(row))
            .collect())
    }

    /// Appends one registration, provisioning the header first if needed.
    ///
    /// Write failures always propagate: a silently dropped registration is a
    /// user-visible loss, unlike a degraded duplicate check.
    pub async fn append(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
        self.ensure_header().await?;
        self.store
            .append_row(&self.sheet, FULL_RANGE, record_to_row(record))
            .await
    }
}

/// True iff some existing record matches the candidate dedup key: identical
/// digits-only phone and byte-identical country code string. `"971"` and
/// `"00971"` are distinct keys.
pub fn is_duplicate(existing: &[RegistrationRecord], phone: &str, country_code: &str) -> bool {
    let digits = phone::digits_only(phone);
    existing
        .iter()
        .any(|record| phone::digits_only(&record.phone) == digits && record.country_code == country_code)
}

fn is_header_row(rows: &[Vec<String>]) -> bool {
    rows.first()
        .and_then(|row| row.first())
        .map(|cell| cell.to_lowercase().contains("inviter"))
        .unwrap_or(false)
}

/// Blank and filler rows the store may contain carry nothing in the first
/// cell.
fn has_content(row: &[String]) -> bool {
    row.first().map(|cell| !cell.trim().is_empty()).unwrap_or(false)
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn optional_cell(row: &[String], index: usize) -> Option<String> {
    let value = cell(row, index).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn record_from_row(row: &[String]) -> RegistrationRecord {
    RegistrationRecord {
        inviter_name: cell(row, 0).to_string(),
        first_name: cell(row, 1).to_string(),
        last_name: cell(row, 2).to_string(),
        // Normalized on read as well as on write so legacy rows with
        // formatted phone numbers still compare correctly.
        phone: phone::digits_only(cell(row, 3)),
        country_code: cell(row, 4).to_string(),
        email: optional_cell(row, 5),
        event_name: optional_cell(row, 6),
        timestamp: parse_timestamp(cell(row, 7)),
    }
}

/// Optional fields are written as empty strings, never omitted, so column
/// positions stay stable. The phone is stored digits-only whatever the
/// record holds.
fn record_to_row(record: &RegistrationRecord) -> Vec<String> {
    vec![
        record.inviter_name.clone(),
        record.first_name.clone(),
        record.last_name.clone(),
        phone::digits_only(&record.phone),
        record.country_code.clone(),
        record.email.clone().unwrap_or_default(),
        record.event_name.clone().unwrap_or_default(),
        record.timestamp.to_rfc3339(),
    ]
}

/// Legacy rows can carry arbitrary timestamp text; those fall back to the
/// epoch instead of dropping the row, which still has to count for dedup.
fn parse_timestamp(cell: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(cell)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
