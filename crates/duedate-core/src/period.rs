//! Validity-period label to day-offset conversion.
//!
//! Labels come from free text ("3 Years", "valid for 18 months", "Annual").
//! The conversion is coarse:
//!
//! - magnitude: the first run of ASCII digits in the label, or 1 if none
//! - unit: years (365 days) if the label mentions "year", else months (30 days)

const DAYS_PER_YEAR: u64 = 365;
const DAYS_PER_MONTH: u64 = 30;

/// First run of ASCII digits in `label`, if any.
///
/// Returns `None` both when there are no digits and when the digits do not
/// fit in a `u64`.
pub fn leading_number(label: &str) -> Option<u64> {
    let bytes = label.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| start + n);
    label[start..end].parse().ok()
}

/// Convert a validity-period label to a day offset.
///
/// Returns `None` when the label holds a number too large to represent.
pub fn period_to_days(label: &str) -> Option<u64> {
    let has_digits = label.bytes().any(|b| b.is_ascii_digit());
    let magnitude = match leading_number(label) {
        Some(n) => n,
        None if has_digits => return None,
        None => 1,
    };
    let unit = if label.to_lowercase().contains("year") {
        DAYS_PER_YEAR
    } else {
        DAYS_PER_MONTH
    };
    magnitude.checked_mul(unit)
}
