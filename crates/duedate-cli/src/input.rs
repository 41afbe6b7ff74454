//! JSON input files: items, sources, history, regulatory entries, config.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use duedate_core::{ComplianceItem, HistoricalRecord, SourceDocument};
use duedate_engine::{RegulatoryEntry, ResolverConfig};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// One item to resolve, optionally with its own search results.
#[derive(Debug, Deserialize)]
pub struct ItemInput {
    #[serde(flatten)]
    pub item: ComplianceItem,
    #[serde(default)]
    pub sources: Vec<SourceDocument>,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {what} in {}", path.display()))
}

pub fn load_items(path: &Path) -> anyhow::Result<Vec<ItemInput>> {
    read_json(path, "items")
}

pub fn load_sources(path: &Path) -> anyhow::Result<Vec<SourceDocument>> {
    read_json(path, "sources")
}

pub fn load_history(path: &Path) -> anyhow::Result<Vec<HistoricalRecord>> {
    read_json(path, "history")
}

pub fn load_regulatory(path: &Path) -> anyhow::Result<HashMap<String, RegulatoryEntry>> {
    read_json(path, "regulatory entries")
}

pub fn load_config(path: &Path) -> anyhow::Result<ResolverConfig> {
    read_json(path, "resolver config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn items_with_inline_sources() {
        let f = write_temp(
            r#"[
                {"Title": "ISO 14001", "Application Date": "2025-01-01",
                 "sources": [{"title": "ISO", "url": "https://www.iso.org/x", "content": "3 years"}]},
                {"title": "GST Compliance", "application_date": "2025-02-01"}
            ]"#,
        );
        let items = load_items(f.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item.title, "ISO 14001");
        assert_eq!(items[0].sources.len(), 1);
        assert!(items[1].sources.is_empty());
    }

    #[test]
    fn history_file() {
        let f = write_temp(
            r#"[{"title": "GST Compliance", "application_date": "2024-01-01", "completed_date": "2024-01-20"}]"#,
        );
        let history = load_history(f.path()).unwrap();
        assert_eq!(history[0].processing_days(), Some(19));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_sources(Path::new("/nonexistent/sources.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/sources.json"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let f = write_temp("{not json");
        assert!(load_config(f.path()).is_err());
    }
}
