//! Timestamp helper.
//!
//! Resource rows store `created_at`/`updated_at` as microseconds since
//! the Unix epoch.

use time::OffsetDateTime;

/// Current time as epoch microseconds.
pub fn now_micros() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000) as i64
}
