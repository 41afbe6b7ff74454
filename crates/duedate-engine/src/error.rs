use thiserror::Error;

/// Why a strategy could not produce a result.
///
/// Never leaves the resolver: a failed strategy is logged and the next one
/// is tried.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unparseable validity period: {0:?}")]
    Period(String),

    #[error("due date out of range: {start} + {days} days")]
    DateOverflow { start: chrono::NaiveDate, days: u64 },
}
