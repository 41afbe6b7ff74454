//! The strategy ladder.
//!
//! | Order | Method | Threshold |
//! |---|---|---|
//! | 1 | Regulatory database | 0.95 |
//! | 2 | Extraction consensus | 0.80 |
//! | 3 | Historical analysis | 0.70 |
//! | 4 | Static mapping | none, any result wins |
//! | 5 | Conservative default | always succeeds |
//!
//! Strategies run one at a time. The first result that clears its own
//! method's threshold is returned and nothing below it runs. A strategy
//! error is logged and treated as "no result".

use chrono::NaiveDate;
use duedate_core::{
    CalculationMethod, ComplianceItem, DueDateResult, HistoricalRecord, SourceDocument,
    TextExtractor, add_days, normalize_title, parse_certification_info, period_to_days,
};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::consensus::build_consensus;
use crate::error::StrategyError;
use crate::extraction::{collect_claims, official_sources};
use crate::historical::HistoricalAnalyzer;
use crate::mapping::{STATIC_CONFIDENCE, india_lead_time, iso_offset_days, match_india_category};
use crate::regulatory::RegulatoryDatabase;

/// Confidence of the terminal fallback.
pub const DEFAULT_CONFIDENCE: f64 = 0.4;
/// Offset of the terminal fallback.
pub const DEFAULT_OFFSET_DAYS: u64 = 365;

/// Per-call inputs besides the item itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    pub sources: &'a [SourceDocument],
    pub history: &'a [HistoricalRecord],
}

/// One rung of the ladder.
pub trait Strategy {
    fn method(&self) -> CalculationMethod;

    /// Reason this strategy cannot run for `item`, if any.
    fn skip_reason(&self, _item: &ComplianceItem, _ctx: &ResolveContext<'_>) -> Option<String> {
        None
    }

    fn attempt(
        &self,
        item: &ComplianceItem,
        ctx: &ResolveContext<'_>,
    ) -> Result<Option<DueDateResult>, StrategyError>;
}

/// What happened when a strategy was tried.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Accepted,
    BelowThreshold(f64),
    NoResult,
    Failed(String),
    Skipped(String),
}

/// Transparency trail entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub method: CalculationMethod,
    pub outcome: AttemptOutcome,
}

/// Due-date resolver with its collaborators injected.
pub struct Resolver {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for Resolver {
    /// Built-in regulatory data, default analyzer, no text extractor.
    fn default() -> Self {
        Self::new(
            RegulatoryDatabase::builtin(),
            HistoricalAnalyzer::default(),
            None,
            ResolverConfig::default(),
        )
    }
}

impl Resolver {
    pub fn new(
        regulatory: RegulatoryDatabase,
        analyzer: HistoricalAnalyzer,
        extractor: Option<Box<dyn TextExtractor>>,
        config: ResolverConfig,
    ) -> Self {
        Self::from_strategies(vec![
            Box::new(RegulatoryStrategy { db: regulatory }),
            Box::new(ExtractionStrategy { extractor, config }),
            Box::new(HistoricalStrategy { analyzer }),
            Box::new(StaticMappingStrategy),
        ])
    }

    /// Use a custom ladder. The conservative default is always appended.
    pub fn from_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve a due date. Never fails.
    pub fn resolve(&self, item: &ComplianceItem, ctx: &ResolveContext<'_>) -> DueDateResult {
        self.resolve_with_trail(item, ctx).0
    }

    /// Resolve a due date and report every strategy that was tried.
    pub fn resolve_with_trail(
        &self,
        item: &ComplianceItem,
        ctx: &ResolveContext<'_>,
    ) -> (DueDateResult, Vec<Attempt>) {
        info!(
            title = %item.title,
            application_date = %item.application_date,
            sources = ctx.sources.len(),
            history = ctx.history.len(),
            "resolving due date"
        );

        let mut trail = Vec::with_capacity(self.strategies.len() + 1);

        for strategy in &self.strategies {
            let method = strategy.method();

            if let Some(reason) = strategy.skip_reason(item, ctx) {
                debug!(%method, %reason, "strategy skipped");
                trail.push(Attempt {
                    method,
                    outcome: AttemptOutcome::Skipped(reason),
                });
                continue;
            }

            let outcome = match strategy.attempt(item, ctx) {
                Ok(Some(result)) => {
                    let result = sanitize(result, item.application_date);
                    if result.method.accepts(result.confidence) {
                        info!(
                            method = %result.method,
                            due_date = %result.due_date,
                            confidence = result.confidence,
                            "due date resolved"
                        );
                        trail.push(Attempt {
                            method,
                            outcome: AttemptOutcome::Accepted,
                        });
                        return (result, trail);
                    }
                    debug!(%method, confidence = result.confidence, "result below threshold");
                    AttemptOutcome::BelowThreshold(result.confidence)
                }
                Ok(None) => AttemptOutcome::NoResult,
                Err(e) => {
                    warn!(%method, error = %e, "strategy failed");
                    AttemptOutcome::Failed(e.to_string())
                }
            };
            trail.push(Attempt { method, outcome });
        }

        let result = conservative_default(item);
        info!(due_date = %result.due_date, "falling back to conservative default");
        trail.push(Attempt {
            method: CalculationMethod::ConservativeDefault,
            outcome: AttemptOutcome::Accepted,
        });
        (result, trail)
    }
}

/// Clamp confidence into `[0, 1]` and keep the due date on or after application.
fn sanitize(mut result: DueDateResult, application_date: NaiveDate) -> DueDateResult {
    result.confidence = if result.confidence.is_nan() {
        0.0
    } else {
        result.confidence.clamp(0.0, 1.0)
    };
    if result.due_date < application_date {
        result.due_date = application_date;
    }
    result
}

fn offset(start: NaiveDate, days: u64) -> Result<NaiveDate, StrategyError> {
    add_days(start, days).ok_or(StrategyError::DateOverflow { start, days })
}

/// Terminal rung: application date + 365 days at confidence 0.4.
pub fn conservative_default(item: &ComplianceItem) -> DueDateResult {
    DueDateResult {
        due_date: add_days(item.application_date, DEFAULT_OFFSET_DAYS).unwrap_or(NaiveDate::MAX),
        method: CalculationMethod::ConservativeDefault,
        confidence: DEFAULT_CONFIDENCE,
        validity_period: Some("1 Year (Default)".to_string()),
        source_urls: Vec::new(),
        calculation_notes: "Unable to find specific timeline. Applied 1-year conservative buffer."
            .to_string(),
        warning: Some("No reliable source found; verify this date manually.".to_string()),
    }
}

// ── Strategies ──

struct RegulatoryStrategy {
    db: RegulatoryDatabase,
}

impl Strategy for RegulatoryStrategy {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::RegulatoryDatabase
    }

    fn skip_reason(&self, item: &ComplianceItem, _ctx: &ResolveContext<'_>) -> Option<String> {
        match parse_certification_info(&item.title).standard {
            Some(_) => None,
            None => Some("no standard named in title".to_string()),
        }
    }

    fn attempt(
        &self,
        item: &ComplianceItem,
        _ctx: &ResolveContext<'_>,
    ) -> Result<Option<DueDateResult>, StrategyError> {
        let info = parse_certification_info(&item.title);
        let Some(entry) = self.db.lookup(info.standard.as_deref(), &info.activity_type) else {
            return Ok(None);
        };
        let standard = info.standard.unwrap_or_default();

        Ok(Some(DueDateResult {
            due_date: offset(item.application_date, entry.lead_time_days)?,
            method: CalculationMethod::RegulatoryDatabase,
            confidence: entry.confidence,
            validity_period: Some(entry.validity_period.clone()),
            source_urls: entry.source_urls.clone(),
            calculation_notes: format!("Found in official regulatory database for {standard}."),
            warning: None,
        }))
    }
}

struct ExtractionStrategy {
    extractor: Option<Box<dyn TextExtractor>>,
    config: ResolverConfig,
}

impl Strategy for ExtractionStrategy {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::LlmExtraction
    }

    fn skip_reason(&self, _item: &ComplianceItem, ctx: &ResolveContext<'_>) -> Option<String> {
        if ctx.sources.is_empty() {
            Some("no sources supplied".to_string())
        } else if self.extractor.is_none() {
            Some("no text extractor configured".to_string())
        } else if official_sources(ctx.sources, &self.config.official_domains).is_empty() {
            Some("no official-domain sources".to_string())
        } else {
            None
        }
    }

    fn attempt(
        &self,
        item: &ComplianceItem,
        ctx: &ResolveContext<'_>,
    ) -> Result<Option<DueDateResult>, StrategyError> {
        let Some(extractor) = self.extractor.as_deref() else {
            return Ok(None);
        };
        let official = official_sources(ctx.sources, &self.config.official_domains);
        let claims = collect_claims(
            extractor,
            &item.title,
            &official,
            self.config.max_extraction_sources,
        );
        let Some(consensus) = build_consensus(&claims, self.config.consensus_weight) else {
            return Ok(None);
        };

        let days = period_to_days(&consensus.validity_period)
            .ok_or_else(|| StrategyError::Period(consensus.validity_period.clone()))?;

        let warning = (!consensus.is_unanimous()).then(|| {
            format!(
                "{} of {} sources agreed on \"{}\".",
                consensus.agreeing, consensus.total, consensus.validity_period
            )
        });

        Ok(Some(DueDateResult {
            due_date: offset(item.application_date, days)?,
            method: CalculationMethod::LlmExtraction,
            confidence: consensus.confidence,
            validity_period: Some(consensus.validity_period.clone()),
            source_urls: claims.iter().map(|c| c.source_url.clone()).collect(),
            calculation_notes: format!(
                "Consensus reached from {} official web sources.",
                claims.len()
            ),
            warning,
        }))
    }
}

struct HistoricalStrategy {
    analyzer: HistoricalAnalyzer,
}

impl HistoricalStrategy {
    /// Past records about the same standard, or with the same normalised title.
    fn similar(item: &ComplianceItem, history: &[HistoricalRecord]) -> Vec<HistoricalRecord> {
        let standard = parse_certification_info(&item.title).standard;
        let title = normalize_title(&item.title);
        history
            .iter()
            .filter(|r| match &standard {
                Some(s) => {
                    let named = r
                        .standard
                        .clone()
                        .or_else(|| parse_certification_info(&r.title).standard);
                    named.as_deref() == Some(s.as_str())
                }
                None => normalize_title(&r.title) == title,
            })
            .cloned()
            .collect()
    }
}

impl Strategy for HistoricalStrategy {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::HistoricalAnalysis
    }

    fn attempt(
        &self,
        item: &ComplianceItem,
        ctx: &ResolveContext<'_>,
    ) -> Result<Option<DueDateResult>, StrategyError> {
        let similar = Self::similar(item, ctx.history);
        let analysis = self.analyzer.analyze(&similar);
        if analysis.sample_size == 0 {
            return Ok(None);
        }

        Ok(Some(DueDateResult {
            due_date: offset(item.application_date, analysis.median_processing_days)?,
            method: CalculationMethod::HistoricalAnalysis,
            confidence: analysis.confidence,
            validity_period: Some("Based on past items".to_string()),
            source_urls: Vec::new(),
            calculation_notes: format!(
                "Median processing time of {} similar past items: {} days.",
                analysis.sample_size, analysis.median_processing_days
            ),
            warning: None,
        }))
    }
}

struct StaticMappingStrategy;

impl Strategy for StaticMappingStrategy {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::StaticMapping
    }

    fn attempt(
        &self,
        item: &ComplianceItem,
        _ctx: &ResolveContext<'_>,
    ) -> Result<Option<DueDateResult>, StrategyError> {
        let (days, category) = if item.title.contains("ISO") {
            let info = parse_certification_info(&item.title);
            let standard = info.standard.unwrap_or_else(|| item.title.clone());
            let days = iso_offset_days(&standard, &info.activity_type);
            (days, format!("{standard} ({})", info.activity_type))
        } else {
            // Unlisted categories take the default lead time.
            let category = match_india_category(&item.title)
                .map_or(item.title.as_str(), |(name, _)| name);
            (india_lead_time(category), category.to_string())
        };

        Ok(Some(DueDateResult {
            due_date: offset(item.application_date, days)?,
            method: CalculationMethod::StaticMapping,
            confidence: STATIC_CONFIDENCE,
            validity_period: Some("Default mapping".to_string()),
            source_urls: Vec::new(),
            calculation_notes: format!(
                "Used static default lead time of {days} days for {category} as fallback."
            ),
            warning: Some("Based on typical lead times, not a source for this item.".to_string()),
        }))
    }
}
