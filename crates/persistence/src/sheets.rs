//! Sheets-backed row store.
//!
//! Talks to a Google-Sheets-style `values` REST API: range GET, range PUT,
//! and `:append` POST, all exchanging `{"values": [[...]]}` payloads. The
//! backend owns the data; this client holds no state between calls.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::metrics::StoreTimer;
use crate::store::{RowStore, StoreError};

/// Configuration for the sheets backend.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// API base URL, e.g. `https://sheets.googleapis.com`.
    pub base_url: String,
    /// Bearer token presented on every call. Minting and refreshing the
    /// token is deployment machinery outside this crate.
    pub token: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// HTTP client for a sheets `values` API.
#[derive(Debug, Clone)]
pub struct SheetsStore {
    client: Client,
    base_url: String,
    token: String,
}

/// Wire shape of a `values` read response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Wire shape of a `values` write/append request body.
#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: &'a [Vec<String>],
}

impl SheetsStore {
    /// Creates a new store client from configuration.
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn values_url(&self, sheet: &str, range: &str) -> String {
        format!("{}/v4/spreadsheets/{}/values/{}", self.base_url, sheet, range)
    }

    /// Maps a non-success response to a [`StoreError`], reading the body for
    /// the operator-facing message.
    async fn error_for(sheet: &str, response: reqwest::Response) -> StoreError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return StoreError::SheetNotFound(sheet.to_string());
        }
        let message = response.text().await.unwrap_or_default();
        StoreError::Api {
            status: status.as_u16(),
            message: truncate(&message, 512),
        }
    }
}

#[async_trait]
impl RowStore for SheetsStore {
    async fn read_range(
        &self,
        sheet: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let timer = StoreTimer::new("read_range");
        let response = self
            .client
            .get(self.values_url(sheet, range))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(sheet, response).await);
        }

        let parsed: ValueRange = response
            .json()
            .await
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        timer.record();

        debug!(sheet = %sheet, range = %range, rows = parsed.values.len(), "Read range");
        Ok(parsed.values)
    }

    async fn write_range(
        &self,
        sheet: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let timer = StoreTimer::new("write_range");
        let response = self
            .client
            .put(self.values_url(sheet, range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&ValueRangeBody { values: &rows })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(sheet, response).await);
        }
        timer.record();

        debug!(sheet = %sheet, range = %range, rows = rows.len(), "Wrote range");
        Ok(())
    }

    async fn append_row(
        &self,
        sheet: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        let timer = StoreTimer::new("append_row");
        let rows = vec![row];
        let response = self
            .client
            .post(format!("{}:append", self.values_url(sheet, range)))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.token)
            .json(&ValueRangeBody { values: &rows })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(sheet, response).await);
        }
        timer.record();

        debug!(sheet = %sheet, range = %range, "Appended row");
        Ok(())
    }
}

fn truncate(message: &str, max_len: usize) -> String {
    if message.len() <= max_len {
        message.to_string()
    } else {
        let mut end = max_len;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SheetsStore {
        SheetsStore::new(&SheetsConfig {
            base_url: "https://sheets.example.com/".to_string(),
            token: "test-token".to_string(),
            timeout_ms: 5000,
        })
        .unwrap()
    }

    #[test]
    fn test_values_url_strips_trailing_slash() {
        let store = store();
        assert_eq!(
            store.values_url("sheet-1", "Sheet1!A1:H1"),
            "https://sheets.example.com/v4/spreadsheets/sheet-1/values/Sheet1!A1:H1"
        );
    }

    #[test]
    fn test_value_range_defaults_to_empty() {
        // An empty sheet read comes back without a "values" key at all.
        let parsed: ValueRange = serde_json::from_str(r#"{"range":"Sheet1!A1:H1"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn test_value_range_parses_rows() {
        let parsed: ValueRange =
            serde_json::from_str(r#"{"values":[["Inviter Name","First Name"],["Raphael"]]}"#)
                .unwrap();
        assert_eq!(parsed.values.len(), 2);
        assert_eq!(parsed.values[1], vec!["Raphael"]);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 512), "short");
        let long = "é".repeat(300);
        let cut = truncate(&long, 511);
        assert!(cut.len() <= 511);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
