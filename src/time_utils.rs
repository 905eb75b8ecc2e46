//! Time utilities for QuickPact.
//!
//! Centralised so every record reads the same clock.

use chrono::{DateTime, Utc};

/// Returns the current UTC timestamp.
#[inline]
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
