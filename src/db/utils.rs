//! Database utility functions.

use chrono::{SecondsFormat, Utc};

/// Get current datetime as an RFC 3339 string with millisecond precision.
///
/// All stored timestamps share this format so they order correctly as text.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize an RFC 3339 timestamp to the stored format.
pub fn normalize_timestamp(value: &str) -> Option<String> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}
