//! Token amount conversion and formatting
//!
//! Deposits are stored in native integer units; the registrar's decimal shift
//! converts them into whole governance tokens.

/// Convert a native amount into whole tokens by dividing by 10^decimals
///
/// # Examples
/// ```
/// use governance_power::utils::currency::native_to_tokens;
///
/// assert_eq!(native_to_tokens(1_000_000, 6), 1.0);
/// assert_eq!(native_to_tokens(500_000_000, 6), 500.0);
/// assert_eq!(native_to_tokens(42, 0), 42.0);
/// ```
pub fn native_to_tokens(amount_native: u64, decimals: u8) -> f64 {
    amount_native as f64 / 10f64.powi(decimals as i32)
}

/// Format a token amount with thousand separators and fixed decimals
///
/// # Examples
/// ```
/// use governance_power::utils::currency::format_tokens;
///
/// assert_eq!(format_tokens(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_tokens(0.5, 3), "0.500");
/// ```
pub fn format_tokens(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };

    let chars: Vec<char> = whole.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Format a native amount as tokens plus the raw integer
///
/// # Examples
/// ```
/// use governance_power::utils::currency::format_native_as_tokens;
///
/// assert_eq!(
///     format_native_as_tokens(1_500_000, 6),
///     "1.500000 tokens (1500000 native)"
/// );
/// ```
pub fn format_native_as_tokens(amount_native: u64, decimals: u8) -> String {
    format!(
        "{:.*} tokens ({} native)",
        decimals as usize,
        native_to_tokens(amount_native, decimals),
        amount_native
    )
}
