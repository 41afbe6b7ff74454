//! Authoritative in-process lookup of known standards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator that replaces spaces in lookup keys ("ISO 9001" → "ISO_9001").
const KEY_SEPARATOR: &str = "_";

/// What the database knows about one standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryEntry {
    pub lead_time_days: u64,
    pub validity_period: String,
    pub confidence: f64,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

/// Keyed table of standards with the highest trust tier.
#[derive(Debug, Clone)]
pub struct RegulatoryDatabase {
    entries: HashMap<String, RegulatoryEntry>,
}

impl Default for RegulatoryDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegulatoryDatabase {
    /// An empty database.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The entries shipped with the engine.
    pub fn builtin() -> Self {
        let mut db = Self::empty();
        db.insert(
            "ISO 9001",
            RegulatoryEntry {
                lead_time_days: 1095,
                validity_period: "3 Years".to_string(),
                confidence: 0.99,
                source_urls: Vec::new(),
            },
        );
        db
    }

    /// Add or replace an entry. `standard` is normalised to a key.
    pub fn insert(&mut self, standard: &str, entry: RegulatoryEntry) {
        self.entries.insert(normalize_key(standard), entry);
    }

    /// Merge entries keyed by standard name, e.g. from a JSON file.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, RegulatoryEntry)>) {
        for (standard, entry) in entries {
            self.insert(&standard, entry);
        }
    }

    /// Look up a standard. `None` if absent or unmapped.
    ///
    /// Entries apply to every activity type; `activity_type` is accepted so
    /// callers need not special-case it.
    pub fn lookup(&self, standard: Option<&str>, activity_type: &str) -> Option<&RegulatoryEntry> {
        let key = normalize_key(standard?);
        let hit = self.entries.get(&key);
        debug!(key = %key, activity_type, found = hit.is_some(), "regulatory lookup");
        hit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(standard: &str) -> String {
    standard.trim().replace(' ', KEY_SEPARATOR)
}
