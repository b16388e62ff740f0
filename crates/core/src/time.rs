//! Date/time helpers shared by the domain crates.
//!
//! Aging and list filters all reason about timestamps the same way; the
//! helpers here keep that arithmetic in one place.

use chrono::{DateTime, Utc};

/// Whole days elapsed from `from` to `now`, truncating partial days.
/// A `from` in the future clamps to zero.
pub fn age_days(from: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - from).num_days().max(0)
}

/// Whether `at` falls inside the inclusive window. Either bound may be
/// open.
pub fn in_window(
    at: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if let Some(from) = from {
        if at < from {
            return false;
        }
    }
    if let Some(to) = to {
        if at > to {
            return false;
        }
    }
    true
}
