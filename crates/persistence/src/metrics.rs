//! Store metrics collection.
//!
//! Provides functions for recording row-store call metrics.

use metrics::histogram;
use std::time::Instant;

/// Record the duration of one store call.
pub fn record_store_call_duration(call_name: &str, duration_secs: f64) {
    histogram!(
        "store_call_duration_seconds",
        "call" => call_name.to_string()
    )
    .record(duration_secs);
}

/// A helper to time store calls and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = StoreTimer::new("read_range");
/// let result = store.read_range(sheet, range).await;
/// timer.record();
/// result
/// ```
pub struct StoreTimer {
    call_name: String,
    start: Instant,
}

impl StoreTimer {
    /// Create a new timer for the given store call name.
    pub fn new(call_name: impl Into<String>) -> Self {
        Self {
            call_name: call_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_store_call_duration(&self.call_name, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timer_creation() {
        let timer = StoreTimer::new("read_range");
        assert_eq!(timer.call_name, "read_range");
    }

    #[test]
    fn test_store_timer_with_string() {
        let name = String::from("append_row");
        let timer = StoreTimer::new(name);
        assert_eq!(timer.call_name, "append_row");
    }
}
