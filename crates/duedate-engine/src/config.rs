//! Tunables for the extraction strategy.

use serde::Deserialize;

/// Domains whose documents count as official sources.
pub const OFFICIAL_DOMAINS: &[&str] = &[
    "iso.org",
    "bis.gov.in",
    "bsigroup.com",
    "tuv.com",
    "gov.in",
];

/// Resolver settings. `Default` carries the production values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Host suffixes accepted as official.
    pub official_domains: Vec<String>,
    /// Maximum number of official documents handed to the extractor.
    pub max_extraction_sources: usize,
    /// Multiplier applied to the consensus agreement ratio.
    pub consensus_weight: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            official_domains: OFFICIAL_DOMAINS.iter().map(|d| d.to_string()).collect(),
            max_extraction_sources: 3,
            consensus_weight: 0.9,
        }
    }
}
