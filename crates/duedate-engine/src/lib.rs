//! Due-date resolution engine.
//!
//! [`Resolver`] walks a fixed ladder of strategies, most authoritative first,
//! and returns the first result that clears its method's confidence
//! threshold. The ladder always ends in a conservative default, so
//! resolution cannot fail.

pub mod config;
pub mod consensus;
pub mod error;
pub mod extraction;
pub mod historical;
pub mod mapping;
pub mod regulatory;
pub mod resolver;

pub use config::ResolverConfig;
pub use consensus::{Consensus, build_consensus};
pub use error::StrategyError;
pub use extraction::{collect_claims, is_official_url, official_sources};
pub use historical::{HistoricalAnalysis, HistoricalAnalyzer};
pub use regulatory::{RegulatoryDatabase, RegulatoryEntry};
pub use resolver::{Attempt, AttemptOutcome, ResolveContext, Resolver, Strategy};
