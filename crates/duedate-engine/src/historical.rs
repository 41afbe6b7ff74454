//! Median processing time learned from past resolved items.

use duedate_core::HistoricalRecord;

/// Median reported when there is nothing to learn from.
pub const FALLBACK_MEDIAN_DAYS: u64 = 365;

/// Outcome of analysing a set of past items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalAnalysis {
    pub confidence: f64,
    pub median_processing_days: u64,
    pub sample_size: usize,
}

/// Turns past processing times into a due-date offset.
///
/// Confidence grows linearly with the number of usable records up to
/// `saturation`, where it reaches `max_confidence`. No records means
/// confidence 0, so this strategy never wins on absent data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalAnalyzer {
    pub max_confidence: f64,
    pub saturation: usize,
}

impl Default for HistoricalAnalyzer {
    fn default() -> Self {
        Self {
            max_confidence: 0.85,
            saturation: 20,
        }
    }
}

impl HistoricalAnalyzer {
    pub fn analyze(&self, history: &[HistoricalRecord]) -> HistoricalAnalysis {
        let mut days: Vec<u64> = history.iter().filter_map(|r| r.processing_days()).collect();

        if days.is_empty() || self.saturation == 0 {
            return HistoricalAnalysis {
                confidence: 0.0,
                median_processing_days: FALLBACK_MEDIAN_DAYS,
                sample_size: days.len(),
            };
        }

        days.sort_unstable();
        let n = days.len();
        let median = if n % 2 == 1 {
            days[n / 2]
        } else {
            // Floor of the two middle values' mean.
            let (a, b) = (days[n / 2 - 1], days[n / 2]);
            a / 2 + b / 2 + (a % 2 + b % 2) / 2
        };

        let coverage = n.min(self.saturation) as f64 / self.saturation as f64;
        HistoricalAnalysis {
            confidence: (coverage * self.max_confidence).clamp(0.0, 1.0),
            median_processing_days: median,
            sample_size: n,
        }
    }
}
