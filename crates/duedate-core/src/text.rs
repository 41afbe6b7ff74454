//! Title normalisation and certification parsing.

use crate::model::CertificationInfo;

/// Activity type assumed when a title names none.
pub const DEFAULT_ACTIVITY: &str = "New Certification";

/// Activity types recognised in titles, longest first so that
/// "Internal Audit Preparation" wins over shorter overlaps.
pub const KNOWN_ACTIVITIES: &[&str] = &[
    "Corrective Action Implementation",
    "Internal Audit Preparation",
    "Surveillance Audit",
    "New Certification",
    "Recertification",
    "Document Review",
    "Gap Analysis",
];

/// Lower-case, strip punctuation, and collapse whitespace.
///
/// "  ISO 9001: Quality!  " → "iso 9001 quality"
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cut `text` to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Parse the standard and activity type named in an item title.
///
/// The standard is "ISO" followed by optional whitespace and at least one
/// digit, normalised to "ISO <digits>". Activity falls back to
/// [`DEFAULT_ACTIVITY`].
pub fn parse_certification_info(title: &str) -> CertificationInfo {
    let lower = title.to_lowercase();
    let activity_type = KNOWN_ACTIVITIES
        .iter()
        .find(|a| lower.contains(&a.to_lowercase()))
        .copied()
        .unwrap_or(DEFAULT_ACTIVITY)
        .to_string();

    CertificationInfo {
        standard: iso_standard(title),
        activity_type,
    }
}

/// Find the first "ISO<ws>*<digits>" occurrence.
fn iso_standard(title: &str) -> Option<String> {
    let bytes = title.as_bytes();
    let mut from = 0;

    while let Some(pos) = title[from..].find("ISO") {
        let mut i = from + pos + 3;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > digits_start {
            return Some(format!("ISO {}", &title[digits_start..i]));
        }
        from += pos + 3;
    }

    None
}
