//! Data model shared by the resolver, its collaborators, and the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A compliance item submitted for due-date resolution.
///
/// Field aliases accept the column names of the intake spreadsheet
/// ("Title", "Application Date", ...). Never mutated by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceItem {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    /// When the compliance process began.
    #[serde(alias = "Application Date")]
    pub application_date: NaiveDate,
    /// Pass-through only.
    #[serde(default, alias = "Responsible Email")]
    pub responsible_email: String,
}

impl ComplianceItem {
    pub fn new(title: impl Into<String>, application_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            application_date,
            responsible_email: String::new(),
        }
    }
}

/// A ranked document returned by the upstream source search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SourceDocument {
    /// Full text when present, otherwise the snippet.
    pub fn text(&self) -> &str {
        if self.content.trim().is_empty() {
            self.snippet.as_deref().unwrap_or("")
        } else {
            &self.content
        }
    }
}

/// A validity-period claim extracted from one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityClaim {
    /// Free-text label such as "3 Years" or "Annual".
    pub validity_period: String,
    pub source_url: String,
}

/// Which strategy produced a [`DueDateResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMethod {
    RegulatoryDatabase,
    LlmExtraction,
    HistoricalAnalysis,
    StaticMapping,
    ConservativeDefault,
}

impl CalculationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegulatoryDatabase => "REGULATORY_DATABASE",
            Self::LlmExtraction => "LLM_EXTRACTION",
            Self::HistoricalAnalysis => "HISTORICAL_ANALYSIS",
            Self::StaticMapping => "STATIC_MAPPING",
            Self::ConservativeDefault => "CONSERVATIVE_DEFAULT",
        }
    }

    /// Minimum confidence a result of this method needs to be accepted.
    ///
    /// `None` means any result is accepted as soon as it is produced.
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Self::RegulatoryDatabase => Some(0.95),
            Self::LlmExtraction => Some(0.80),
            Self::HistoricalAnalysis => Some(0.70),
            Self::StaticMapping | Self::ConservativeDefault => None,
        }
    }

    /// Whether `confidence` clears this method's threshold.
    pub fn accepts(&self, confidence: f64) -> bool {
        self.threshold().is_none_or(|t| confidence >= t)
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved deadline plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueDateResult {
    pub due_date: NaiveDate,
    pub method: CalculationMethod,
    /// Heuristic trust score in `[0, 1]`.
    pub confidence: f64,
    pub validity_period: Option<String>,
    pub source_urls: Vec<String>,
    pub calculation_notes: String,
    pub warning: Option<String>,
}

/// A past item with a known completion, used for historical analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub title: String,
    #[serde(default)]
    pub standard: Option<String>,
    pub application_date: NaiveDate,
    pub completed_date: NaiveDate,
}

impl HistoricalRecord {
    /// Days between application and completion; `None` if completion precedes application.
    pub fn processing_days(&self) -> Option<u64> {
        let days = (self.completed_date - self.application_date).num_days();
        u64::try_from(days).ok()
    }
}

/// Certification facts parsed from an item title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationInfo {
    /// Normalised standard name, e.g. "ISO 9001".
    pub standard: Option<String>,
    pub activity_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ladder_thresholds_descend() {
        let ladder = [
            CalculationMethod::RegulatoryDatabase,
            CalculationMethod::LlmExtraction,
            CalculationMethod::HistoricalAnalysis,
            CalculationMethod::StaticMapping,
            CalculationMethod::ConservativeDefault,
        ];
        let thresholds: Vec<f64> = ladder
            .iter()
            .filter_map(|m| m.threshold())
            .collect();
        assert_eq!(thresholds, vec![0.95, 0.80, 0.70]);
    }

    #[test]
    fn accepts_respects_threshold() {
        assert!(CalculationMethod::RegulatoryDatabase.accepts(0.99));
        assert!(CalculationMethod::RegulatoryDatabase.accepts(0.95));
        assert!(!CalculationMethod::RegulatoryDatabase.accepts(0.94));
        assert!(!CalculationMethod::LlmExtraction.accepts(0.6));
        assert!(CalculationMethod::StaticMapping.accepts(0.0));
    }

    #[test]
    fn method_serialises_as_screaming_snake() {
        let json = serde_json::to_string(&CalculationMethod::LlmExtraction).unwrap();
        assert_eq!(json, "\"LLM_EXTRACTION\"");
        assert_eq!(
            CalculationMethod::ConservativeDefault.to_string(),
            "CONSERVATIVE_DEFAULT"
        );
    }

    #[test]
    fn item_accepts_spreadsheet_column_names() {
        let json = r#"{
            "Title": "ISO 9001 Certification",
            "Description": "Quality management",
            "Application Date": "2025-01-01",
            "Responsible Email": "qa@example.com"
        }"#;
        let item: ComplianceItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.title, "ISO 9001 Certification");
        assert_eq!(item.application_date, date(2025, 1, 1));
        assert_eq!(item.responsible_email, "qa@example.com");
    }

    #[test]
    fn item_optional_fields_default() {
        let json = r#"{"title": "GST Compliance", "application_date": "2025-03-10"}"#;
        let item: ComplianceItem = serde_json::from_str(json).unwrap();
        assert!(item.description.is_empty());
        assert!(item.responsible_email.is_empty());
    }

    #[test]
    fn source_text_falls_back_to_snippet() {
        let doc = SourceDocument {
            title: "ISO".into(),
            url: "https://www.iso.org/x".into(),
            content: "   ".into(),
            snippet: Some("valid for 3 years".into()),
        };
        assert_eq!(doc.text(), "valid for 3 years");

        let doc = SourceDocument {
            content: "full body".into(),
            ..doc
        };
        assert_eq!(doc.text(), "full body");
    }

    #[test]
    fn processing_days_rejects_inverted_records() {
        let ok = HistoricalRecord {
            title: "a".into(),
            standard: None,
            application_date: date(2025, 1, 1),
            completed_date: date(2025, 3, 2),
        };
        assert_eq!(ok.processing_days(), Some(60));

        let bad = HistoricalRecord {
            completed_date: date(2024, 12, 1),
            ..ok
        };
        assert_eq!(bad.processing_days(), None);
    }
}
