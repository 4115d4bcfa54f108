//! Time utilities for lockup reporting

use chrono::{TimeZone, Utc};

/// Seconds in a day (24 × 60 × 60 = 86400)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Convert Unix timestamp to ISO 8601 date string (YYYY-MM-DD)
///
/// Returns "1970-01-01" for invalid timestamps.
///
/// # Examples
/// ```
/// use governance_power::utils::time::timestamp_to_iso;
/// assert_eq!(timestamp_to_iso(0), "1970-01-01");
/// assert_eq!(timestamp_to_iso(1704067200), "2024-01-01");
/// ```
pub fn timestamp_to_iso(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}

/// Human-readable remaining lockup ("expired", "12d", "1y 30d")
///
/// # Examples
/// ```
/// use governance_power::utils::time::format_remaining;
/// assert_eq!(format_remaining(100, 200), "expired");
/// assert_eq!(format_remaining(86_400 * 3, 0), "3d");
/// assert_eq!(format_remaining(86_400 * 400, 0), "1y 35d");
/// ```
pub fn format_remaining(end_ts: i64, now: i64) -> String {
    let remaining = end_ts.saturating_sub(now);
    if remaining <= 0 {
        return "expired".to_string();
    }
    let days = remaining / SECONDS_PER_DAY;
    if days == 0 {
        return format!("{}h", remaining / 3600);
    }
    let years = days / 365;
    if years > 0 {
        format!("{}y {}d", years, days % 365)
    } else {
        format!("{}d", days)
    }
}
