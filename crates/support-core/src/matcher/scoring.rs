//! Similarity scorers on a 0–100 integer scale and the registry that resolves them by name.

use super::sequence::SequenceMatcher;
use std::sync::Arc;

pub const PARTIAL_RATIO: &str = "partial_ratio";
pub const RATIO: &str = "ratio";
pub const JARO_WINKLER: &str = "jaro_winkler";

/// Ratios above this count as a perfect window match.
const PERFECT_WINDOW: f64 = 0.995;

/// Trait implemented by every similarity metric the matcher can use.
pub trait Scorer: Send + Sync {
    /// Unique scorer name for configuration lookup.
    fn name(&self) -> &str;

    /// Similarity of `a` and `b` in `0..=100`. Inputs are compared as given (no normalization).
    fn score(&self, a: &str, b: &str) -> u8;
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scorer: {0}")]
pub struct UnknownScorer(pub String);

fn to_percent(ratio: f64) -> u8 {
    (100.0 * ratio).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Best-aligned substring similarity: the shorter string is slid over windows of the longer
/// string anchored at each matching block, and the best window ratio wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartialRatio;

impl Scorer for PartialRatio {
    fn name(&self) -> &str {
        PARTIAL_RATIO
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

        let mut best = 0.0f64;
        for block in SequenceMatcher::new(shorter, longer).matching_blocks() {
            let start = block.b_start.saturating_sub(block.a_start);
            let end = (start + shorter.len()).min(longer.len());
            let window = &longer[start.min(end)..end];
            let r = SequenceMatcher::new(shorter, window).ratio();
            if r > PERFECT_WINDOW {
                return 100;
            }
            best = best.max(r);
        }
        to_percent(best)
    }
}

/// Whole-string block ratio; penalizes length mismatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ratio;

impl Scorer for Ratio {
    fn name(&self) -> &str {
        RATIO
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        to_percent(SequenceMatcher::new(&a, &b).ratio())
    }
}

/// Jaro–Winkler similarity scaled to 0–100.
#[derive(Debug, Default, Clone, Copy)]
pub struct JaroWinkler;

impl Scorer for JaroWinkler {
    fn name(&self) -> &str {
        JARO_WINKLER
    }

    fn score(&self, a: &str, b: &str) -> u8 {
        to_percent(strsim::jaro_winkler(a, b))
    }
}

/// Registry of scorers that can be resolved by name. Starts empty; see [`ScorerRegistry::with_builtin`].
#[derive(Default)]
pub struct ScorerRegistry {
    scorers: Vec<Arc<dyn Scorer>>,
}

impl ScorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in scorer.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PartialRatio));
        registry.register(Arc::new(Ratio));
        registry.register(Arc::new(JaroWinkler));
        registry
    }

    /// Registers a scorer. Lookups return the first registration for a name.
    pub fn register(&mut self, scorer: Arc<dyn Scorer>) {
        self.scorers.push(scorer);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Scorer>> {
        self.scorers.iter().find(|s| s.name() == name).cloned()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Scorer>, UnknownScorer> {
        self.get(name).ok_or_else(|| UnknownScorer(name.to_string()))
    }

    pub fn scorer_names(&self) -> Vec<String> {
        self.scorers.iter().map(|s| s.name().to_string()).collect()
    }
}
