//! Time and timestamp helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp used for timer bookkeeping (scheduled-at, deadline).
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Compute the wall-clock deadline of a delay starting at `from`.
///
/// Saturates at `from` when the delay does not fit in a `chrono` duration.
#[must_use]
pub fn deadline_after(from: Timestamp, delay: Duration) -> Timestamp {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delta| from.checked_add_signed(delta))
        .unwrap_or(from)
}
