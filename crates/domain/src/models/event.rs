//! Per-event static configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static configuration for one event: display info plus the reference to
/// the external sheet backing its guest registry.
///
/// Loaded from configuration, immutable for the duration of a request, and
/// never mutated by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventConfig {
    pub display_name: String,

    /// Banner media reference shown on the event page.
    #[serde(default)]
    pub banner: Option<String>,

    pub guest_list_closes_at: DateTime<Utc>,

    pub party_starts_at: DateTime<Utc>,

    /// Identifier of the external sheet backing this event's registry.
    pub sheet: String,
}

impl EventConfig {
    /// Whether the guest list is still accepting registrations at `now`.
    pub fn guest_list_open(&self, now: DateTime<Utc>) -> bool {
        now < self.guest_list_closes_at
    }
}
