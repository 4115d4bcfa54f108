//! Mathematical utility functions for run statistics and leaderboard shares
//!
//! Percentage helpers with proper zero-division handling.

/// Calculate percentage safely for u64 values, returning 0.0 if total is zero.
///
/// **Precision Note**: Large u64 values (>2^53) may lose precision when cast to f64.
/// This is acceptable for percentage display purposes where sub-percentage precision
/// is not critical.
///
/// # Examples
/// ```
/// use governance_power::utils::math::safe_percentage_u64;
///
/// assert_eq!(safe_percentage_u64(50, 100), 50.0);
/// assert_eq!(safe_percentage_u64(1_000_000_000, 2_000_000_000), 50.0);
/// assert_eq!(safe_percentage_u64(0, 100), 0.0);
/// assert_eq!(safe_percentage_u64(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage_u64(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Share of `part` in `total` as a percentage, 0.0 when total is not positive.
///
/// # Examples
/// ```
/// use governance_power::utils::math::safe_share;
///
/// assert_eq!(safe_share(250.0, 1000.0), 25.0);
/// assert_eq!(safe_share(1.0, 0.0), 0.0);
/// ```
#[inline]
pub fn safe_share(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (part / total) * 100.0
    }
}
