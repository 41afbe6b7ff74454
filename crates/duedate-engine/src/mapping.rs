//! Static lead-time tables: the low-confidence fallback tier.
//!
//! Two tables keyed by category name. ISO entries also take a signed
//! adjustment by activity type. Unknown categories get
//! [`DEFAULT_LEAD_TIME_DAYS`].

/// Lead time for any category not in a table.
pub const DEFAULT_LEAD_TIME_DAYS: u64 = 30;

/// Confidence of every static-mapping result.
pub const STATIC_CONFIDENCE: f64 = 0.6;

/// ISO management-system standards → base lead time in days.
pub const ISO_LEAD_TIMES: &[(&str, u64)] = &[
    ("ISO 9001 - Quality Management", 90),
    ("ISO 14001 - Environmental Management", 90),
    ("ISO 27001 - Information Security Management", 120),
    ("ISO 45001 - Occupational Health & Safety", 90),
    ("ISO 22000 - Food Safety Management", 90),
    ("ISO 50001 - Energy Management", 120),
    ("ISO 13485 - Medical Devices Quality Management", 120),
    ("ISO 20000 - IT Service Management", 120),
];

/// Days added to (or removed from) an ISO lead time per activity type.
pub const ISO_ACTIVITY_ADJUSTMENTS: &[(&str, i64)] = &[
    ("New Certification", 30),
    ("Recertification", 0),
    ("Surveillance Audit", -30),
    ("Gap Analysis", -60),
    ("Internal Audit Preparation", -45),
    ("Document Review", -75),
    ("Corrective Action Implementation", -30),
];

/// Indian regulatory categories → lead time in days.
pub const INDIA_LEAD_TIMES: &[(&str, u64)] = &[
    ("Bureau of Indian Standards (BIS)", 180),
    ("Central Pollution Control Board (CPCB)", 120),
    ("Environmental Clearance", 270),
    ("Factory Act Compliance", 60),
    ("Labour Law Compliance", 60),
    ("GST Compliance", 30),
    ("Import/Export Regulations", 90),
    ("Industry-Specific License", 120),
    ("State-Level Compliance", 90),
];

/// Base lead time for an ISO standard.
///
/// Accepts either the full table key ("ISO 9001 - Quality Management") or
/// just the standard code ("ISO 9001").
pub fn iso_lead_time(standard: &str) -> u64 {
    let standard = standard.trim();
    ISO_LEAD_TIMES
        .iter()
        .find(|(name, _)| {
            *name == standard
                || name
                    .strip_prefix(standard)
                    .is_some_and(|rest| rest.starts_with(' '))
        })
        .map_or(DEFAULT_LEAD_TIME_DAYS, |(_, days)| *days)
}

/// Signed adjustment for an activity type; 0 when unknown.
pub fn activity_adjustment(activity_type: &str) -> i64 {
    ISO_ACTIVITY_ADJUSTMENTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(activity_type.trim()))
        .map_or(0, |(_, days)| *days)
}

/// Total ISO offset, clamped so it never goes negative.
pub fn iso_offset_days(standard: &str, activity_type: &str) -> u64 {
    let base = i64::try_from(iso_lead_time(standard)).unwrap_or(i64::MAX);
    let total = base.saturating_add(activity_adjustment(activity_type));
    u64::try_from(total).unwrap_or(0)
}

/// Lead time for an exact Indian category name.
pub fn india_lead_time(category: &str) -> u64 {
    INDIA_LEAD_TIMES
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(DEFAULT_LEAD_TIME_DAYS, |(_, days)| *days)
}

/// Find the Indian category a title refers to.
///
/// Matches the full category name case-insensitively, or the parenthesised
/// acronym ("BIS", "CPCB") as a whole word.
pub fn match_india_category(title: &str) -> Option<(&'static str, u64)> {
    let lower = title.to_lowercase();
    let words: Vec<&str> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    INDIA_LEAD_TIMES
        .iter()
        .find(|(name, _)| {
            lower.contains(&name.to_lowercase())
                || acronym(name).is_some_and(|a| words.contains(&a))
        })
        .copied()
}

/// "Bureau of Indian Standards (BIS)" → "BIS"
fn acronym(name: &str) -> Option<&str> {
    let open = name.rfind('(')?;
    let close = name[open..].find(')')? + open;
    Some(&name[open + 1..close])
}
