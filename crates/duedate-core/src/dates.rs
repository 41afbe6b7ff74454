//! Calendar-date parsing, offsetting, and urgency levels.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date layouts accepted from intake forms, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%d %B %Y",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognised date: {0:?}")]
    Unrecognised(String),
}

/// Parse a date written in any of the intake form layouts.
///
/// Day-first layouts win over month-first ones for ambiguous input
/// ("03/04/2025" is 3 April).
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| DateError::Unrecognised(s.to_string()))
}

/// `start + days`, or `None` past the end of the representable calendar.
pub fn add_days(start: NaiveDate, days: u64) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(days))
}

/// How soon a deadline needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Overdue items and anything due within 3 days are critical.
    pub fn from_days_until(days: i64) -> Self {
        match days {
            ..=3 => Self::Critical,
            4..=7 => Self::High,
            8..=14 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn for_due_date(due: NaiveDate, today: NaiveDate) -> Self {
        Self::from_days_until((due - today).num_days())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}
