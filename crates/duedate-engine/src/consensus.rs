//! Majority agreement over validity claims from independent sources.

use duedate_core::ValidityClaim;

/// The agreed validity period and how strongly the sources back it.
#[derive(Debug, Clone, PartialEq)]
pub struct Consensus {
    pub validity_period: String,
    /// `agreeing / total * weight`.
    pub confidence: f64,
    pub agreeing: usize,
    pub total: usize,
}

impl Consensus {
    pub fn is_unanimous(&self) -> bool {
        self.agreeing == self.total
    }
}

/// Pick the most frequent label. Ties go to the label seen first.
///
/// `weight` caps extraction-derived confidence below the regulatory tier.
/// Returns `None` for no claims.
pub fn build_consensus(claims: &[ValidityClaim], weight: f64) -> Option<Consensus> {
    // (label, count) in first-seen order.
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for claim in claims {
        let label = claim.validity_period.as_str();
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(label, count) in &tally {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    let (label, count) = best?;

    let total = claims.len();
    Some(Consensus {
        validity_period: label.to_string(),
        confidence: (count as f64 / total as f64 * weight).clamp(0.0, 1.0),
        agreeing: count,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(labels: &[&str]) -> Vec<ValidityClaim> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| ValidityClaim {
                validity_period: l.to_string(),
                source_url: format!("https://iso.org/{i}"),
            })
            .collect()
    }

    #[test]
    fn no_claims_no_consensus() {
        assert!(build_consensus(&[], 0.9).is_none());
    }

    #[test]
    fn majority_wins() {
        let c = build_consensus(&claims(&["3 Years", "3 Years", "Annual"]), 0.9).unwrap();
        assert_eq!(c.validity_period, "3 Years");
        assert!((c.confidence - 0.6).abs() < 1e-9, "got {}", c.confidence);
        assert_eq!((c.agreeing, c.total), (2, 3));
        assert!(!c.is_unanimous());
    }

    #[test]
    fn unanimous_reaches_weight() {
        let c = build_consensus(&claims(&["3 Years", "3 Years", "3 Years"]), 0.9).unwrap();
        assert!((c.confidence - 0.9).abs() < 1e-9);
        assert!(c.is_unanimous());
    }

    #[test]
    fn single_claim() {
        let c = build_consensus(&claims(&["Annual"]), 0.9).unwrap();
        assert_eq!(c.validity_period, "Annual");
        assert!((c.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let c = build_consensus(&claims(&["Annual", "3 Years", "3 Years", "Annual"]), 0.9).unwrap();
        assert_eq!(c.validity_period, "Annual");

        let c = build_consensus(&claims(&["2 Years", "Annual"]), 0.9).unwrap();
        assert_eq!(c.validity_period, "2 Years");
        assert!((c.confidence - 0.45).abs() < 1e-9);
    }
}
