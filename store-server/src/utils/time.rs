//! Time helpers
//!
//! All timestamps in storage are `i64` Unix millis; RFC 3339 strings only
//! appear at the API boundary.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Seconds until `expires_at`, clamped at zero
pub fn seconds_until(expires_at: i64, now: i64) -> i64 {
    ((expires_at - now) / 1000).max(0)
}

/// Unix millis as an RFC 3339 UTC string
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}
