use ragline_config::MetricKind;
use std::collections::HashMap;

/// Scores a model answer against a reference answer. Higher is better,
/// results fall in `[0, 1]`.
pub trait Metric: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, candidate: &str, reference: &str) -> f64;
}

pub fn metric_for(kind: MetricKind) -> Box<dyn Metric> {
    match kind {
        MetricKind::TokenPrecision => Box::new(TokenPrecision),
        MetricKind::TokenRecall => Box::new(TokenRecall),
        MetricKind::TokenF1 => Box::new(TokenF1),
        MetricKind::ExactMatch => Box::new(ExactMatch),
    }
}

/// Lowercased alphanumeric runs
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Multiset intersection size and the two token counts
fn overlap(candidate: &str, reference: &str) -> (usize, usize, usize) {
    let cand = tokens(candidate);
    let refs = tokens(reference);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in &refs {
        *counts.entry(t.as_str()).or_default() += 1;
    }
    let mut common = 0;
    for t in &cand {
        if let Some(n) = counts.get_mut(t.as_str()) {
            if *n > 0 {
                *n -= 1;
                common += 1;
            }
        }
    }
    (common, cand.len(), refs.len())
}

fn ratio(common: usize, total: usize, other: usize) -> f64 {
    match (total, other) {
        (0, 0) => 1.0,
        (0, _) => 0.0,
        _ => common as f64 / total as f64,
    }
}

pub struct TokenPrecision;

impl Metric for TokenPrecision {
    fn name(&self) -> &'static str {
        MetricKind::TokenPrecision.as_str()
    }

    fn score(&self, candidate: &str, reference: &str) -> f64 {
        let (common, cand, refs) = overlap(candidate, reference);
        ratio(common, cand, refs)
    }
}

pub struct TokenRecall;

impl Metric for TokenRecall {
    fn name(&self) -> &'static str {
        MetricKind::TokenRecall.as_str()
    }

    fn score(&self, candidate: &str, reference: &str) -> f64 {
        let (common, cand, refs) = overlap(candidate, reference);
        ratio(common, refs, cand)
    }
}

pub struct TokenF1;

impl Metric for TokenF1 {
    fn name(&self) -> &'static str {
        MetricKind::TokenF1.as_str()
    }

    fn score(&self, candidate: &str, reference: &str) -> f64 {
        let (common, cand, refs) = overlap(candidate, reference);
        let p = ratio(common, cand, refs);
        let r = ratio(common, refs, cand);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

/// 1.0 when the token sequences are identical, else 0.0
pub struct ExactMatch;

impl Metric for ExactMatch {
    fn name(&self) -> &'static str {
        MetricKind::ExactMatch.as_str()
    }

    fn score(&self, candidate: &str, reference: &str) -> f64 {
        if tokens(candidate) == tokens(reference) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_partial_overlap() {
        let cand = "Paris is the capital";
        let reference = "The capital of France is Paris";
        assert!(close(TokenPrecision.score(cand, reference), 1.0));
        assert!(close(TokenRecall.score(cand, reference), 4.0 / 6.0));
        assert!(close(TokenF1.score(cand, reference), 0.8));
    }

    #[test]
    fn test_repeated_tokens_counted_once_each() {
        assert!(close(TokenPrecision.score("paris paris paris", "paris"), 1.0 / 3.0));
    }

    #[test]
    fn test_disjoint_and_empty() {
        assert_eq!(TokenF1.score("london", "paris"), 0.0);
        assert_eq!(TokenF1.score("", "paris"), 0.0);
        assert_eq!(TokenF1.score("", ""), 1.0);
    }

    #[test]
    fn test_exact_match_ignores_case_and_punctuation() {
        assert_eq!(ExactMatch.score("Paris.", "paris"), 1.0);
        assert_eq!(ExactMatch.score("Paris, France", "paris"), 0.0);
    }

    #[test]
    fn test_metric_for_names() {
        for kind in MetricKind::ALL {
            assert_eq!(metric_for(kind).name(), kind.as_str());
        }
    }
}
