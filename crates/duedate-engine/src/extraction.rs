//! Validity extractor adapter: runs the Text Extractor over official sources.

use duedate_core::{SourceDocument, TextExtractor, ValidityClaim};
use tracing::{debug, warn};
use url::Url;

/// Host of an absolute URL, lower-cased. `None` if unparseable or hostless.
fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Whether `url`'s host is one of `domains` or a subdomain of one.
pub fn is_official_url(url: &str, domains: &[String]) -> bool {
    let Some(host) = url_host(url) else {
        return false;
    };
    domains.iter().any(|d| {
        let d = d.trim().trim_start_matches('.').to_ascii_lowercase();
        !d.is_empty()
            && (host == d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

/// Sources hosted on an official domain, in input order.
pub fn official_sources<'a>(
    sources: &'a [SourceDocument],
    domains: &[String],
) -> Vec<&'a SourceDocument> {
    sources
        .iter()
        .filter(|s| is_official_url(&s.url, domains))
        .collect()
}

/// Ask the extractor about each of the first `limit` official documents.
///
/// A document that fails extraction, or yields an empty label, contributes
/// no claim.
pub fn collect_claims(
    extractor: &dyn TextExtractor,
    subject: &str,
    documents: &[&SourceDocument],
    limit: usize,
) -> Vec<ValidityClaim> {
    let mut claims = Vec::new();

    for doc in documents.iter().take(limit) {
        match extractor.extract(subject, doc.text()) {
            Ok(Some(label)) if !label.trim().is_empty() => {
                debug!(url = %doc.url, validity_period = %label.trim(), "validity claim extracted");
                claims.push(ValidityClaim {
                    validity_period: label.trim().to_string(),
                    source_url: doc.url.clone(),
                });
            }
            Ok(_) => debug!(url = %doc.url, "no validity claim in document"),
            Err(e) => warn!(url = %doc.url, error = %e, "validity extraction failed"),
        }
    }

    claims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use duedate_core::ExtractError;
    use std::cell::Cell;

    fn doc(url: &str, content: &str) -> SourceDocument {
        SourceDocument {
            title: "doc".into(),
            url: url.into(),
            content: content.into(),
            snippet: None,
        }
    }

    /// Returns the document text as the claim; fails on "boom".
    struct EchoExtractor {
        calls: Cell<usize>,
    }

    impl TextExtractor for EchoExtractor {
        fn extract(&self, _subject: &str, text: &str) -> Result<Option<String>, ExtractError> {
            self.calls.set(self.calls.get() + 1);
            match text {
                "boom" => Err(ExtractError::Backend("connection reset".into())),
                "" => Ok(None),
                t => Ok(Some(t.to_string())),
            }
        }
    }

    fn domains() -> Vec<String> {
        ResolverConfig::default().official_domains
    }

    #[test]
    fn host_parsing() {
        assert_eq!(url_host("https://www.iso.org/standard/62085.html").as_deref(), Some("www.iso.org"));
        assert_eq!(url_host("http://user@BIS.gov.in:8080/x?y").as_deref(), Some("bis.gov.in"));
        assert_eq!(url_host("https://www.iso.org./x").as_deref(), Some("www.iso.org"));
        assert_eq!(url_host("iso.org/path"), None);
        assert_eq!(url_host("mailto:audit@iso.org"), None);
    }

    #[test]
    fn backslash_ends_the_host() {
        assert_eq!(
            url_host("https://evil.example\\.iso.org/page").as_deref(),
            Some("evil.example")
        );
        assert!(!is_official_url("https://evil.example\\.iso.org/page", &domains()));
    }

    #[test]
    fn official_domains_match_suffixes() {
        let d = domains();
        assert!(is_official_url("https://www.iso.org/iso-9001", &d));
        assert!(is_official_url("https://iso.org", &d));
        assert!(is_official_url("https://cpcb.nic.gov.in/consent", &d));
        assert!(is_official_url("https://www.bsigroup.com/en-GB/", &d));
    }

    #[test]
    fn lookalike_domains_are_not_official() {
        let d = domains();
        assert!(!is_official_url("https://notiso.org/x", &d));
        assert!(!is_official_url("https://iso.org.example.com/x", &d));
        assert!(!is_official_url("https://blog.example.com/iso.org", &d));
        assert!(!is_official_url("", &d));
    }

    #[test]
    fn filters_preserve_order() {
        let sources = vec![
            doc("https://example.com/a", "x"),
            doc("https://www.tuv.com/b", "y"),
            doc("https://www.iso.org/c", "z"),
        ];
        let official = official_sources(&sources, &domains());
        let urls: Vec<&str> = official.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.tuv.com/b", "https://www.iso.org/c"]);
    }

    #[test]
    fn caps_extraction_at_limit() {
        let sources: Vec<_> = (0..5).map(|i| doc(&format!("https://iso.org/{i}"), "3 Years")).collect();
        let refs: Vec<&SourceDocument> = sources.iter().collect();
        let extractor = EchoExtractor { calls: Cell::new(0) };

        let claims = collect_claims(&extractor, "ISO 14001", &refs, 3);
        assert_eq!(claims.len(), 3);
        assert_eq!(extractor.calls.get(), 3);
        assert_eq!(claims[2].source_url, "https://iso.org/2");
    }

    #[test]
    fn failures_and_empty_answers_are_swallowed() {
        let sources = vec![
            doc("https://iso.org/1", "boom"),
            doc("https://iso.org/2", ""),
            doc("https://iso.org/3", "  3 Years  "),
        ];
        let refs: Vec<&SourceDocument> = sources.iter().collect();
        let extractor = EchoExtractor { calls: Cell::new(0) };

        let claims = collect_claims(&extractor, "ISO 14001", &refs, 3);
        assert_eq!(
            claims,
            vec![ValidityClaim {
                validity_period: "3 Years".into(),
                source_url: "https://iso.org/3".into(),
            }]
        );
    }
}
