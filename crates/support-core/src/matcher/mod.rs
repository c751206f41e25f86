//! Relevance matching: scores a query against every knowledge entry and picks one answer or none.
//!
//! Query and questions are lower-cased before scoring. The first entry with the highest score
//! wins, and only scores strictly above the threshold are eligible.

mod scoring;
mod sequence;

pub use scoring::{
    JaroWinkler, PartialRatio, Ratio, Scorer, ScorerRegistry, UnknownScorer, JARO_WINKLER,
    PARTIAL_RATIO, RATIO,
};
pub use sequence::{Block, SequenceMatcher};

use crate::knowledge::KnowledgeBase;
use serde::Serialize;
use std::sync::Arc;

/// Scores must be strictly greater than this to produce an answer.
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Outcome of matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "answer", rename_all = "snake_case")]
pub enum QueryResult {
    Answer(String),
    NoMatch,
}

impl QueryResult {
    pub fn answer(&self) -> Option<&str> {
        match self {
            QueryResult::Answer(a) => Some(a),
            QueryResult::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, QueryResult::Answer(_))
    }
}

/// The winning entry of a match, with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDetail {
    /// Position of the entry in the knowledge base.
    pub index: usize,
    pub question: String,
    pub answer: String,
    pub score: u8,
}

/// Pure matcher over a pluggable scorer. Holds no per-query state.
#[derive(Clone)]
pub struct Matcher {
    scorer: Arc<dyn Scorer>,
    threshold: u8,
}

impl Matcher {
    pub fn new(scorer: Arc<dyn Scorer>, threshold: u8) -> Self {
        Self { scorer, threshold }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Best entry scoring above the threshold, if any.
    pub fn best_match(&self, query: &str, kb: &KnowledgeBase) -> Option<MatchDetail> {
        let query = query.to_lowercase();
        let mut best: Option<(usize, u8)> = None;

        for (index, entry) in kb.iter().enumerate() {
            let score = self.scorer.score(&query, &entry.question.to_lowercase());
            tracing::trace!(index, score, question = %entry.question, "Scored entry");
            let beats_best = best.map_or(true, |(_, s)| score > s);
            if score > self.threshold && beats_best {
                best = Some((index, score));
            }
        }

        let detail = best.map(|(index, score)| {
            let entry = &kb.entries()[index];
            MatchDetail {
                index,
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                score,
            }
        });
        match &detail {
            Some(d) => tracing::debug!(index = d.index, score = d.score, "Query matched"),
            None => tracing::debug!(threshold = self.threshold, "No entry above threshold"),
        }
        detail
    }

    /// Answer of the best entry, or `NoMatch`.
    pub fn find(&self, query: &str, kb: &KnowledgeBase) -> QueryResult {
        match self.best_match(query, kb) {
            Some(d) => QueryResult::Answer(d.answer),
            None => QueryResult::NoMatch,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Arc::new(PartialRatio), DEFAULT_THRESHOLD)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("scorer", &self.scorer.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Matches with the default partial-ratio scorer and threshold.
pub fn find_relevant_answer(query: &str, kb: &KnowledgeBase) -> QueryResult {
    Matcher::default().find(query, kb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin()
    }

    fn answer_of(index: usize) -> String {
        kb().entries()[index].answer.clone()
    }

    /// Scores by a fixed table keyed on the question text.
    struct FixedScorer(Vec<(&'static str, u8)>);

    impl Scorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }

        fn score(&self, _a: &str, b: &str) -> u8 {
            self.0
                .iter()
                .find(|(q, _)| *q == b)
                .map(|(_, s)| *s)
                .unwrap_or(0)
        }
    }

    #[test]
    fn test_exact_question_returns_its_answer() {
        let kb = kb();
        for entry in kb.iter() {
            assert_eq!(
                find_relevant_answer(&entry.question, &kb),
                QueryResult::Answer(entry.answer.clone())
            );
            assert_eq!(
                find_relevant_answer(&entry.question.to_uppercase(), &kb),
                QueryResult::Answer(entry.answer.clone())
            );
        }
    }

    #[test]
    fn test_what_does_eva_do() {
        let detail = Matcher::default().best_match("What does EVA do?", &kb()).unwrap();
        // EVA and CAM questions tie at 71; the earlier entry wins.
        assert_eq!(detail.index, 0);
        assert_eq!(detail.score, 71);
        assert_eq!(detail.answer, answer_of(0));
    }

    #[test]
    fn test_fragment_matches_eva() {
        assert_eq!(find_relevant_answer("eva", &kb()), QueryResult::Answer(answer_of(0)));
    }

    #[test]
    fn test_tell_me_about_cam_names_cam() {
        let detail = Matcher::default().best_match("Tell me about CAM", &kb()).unwrap();
        assert_eq!(detail.index, 3);
        assert!(detail.answer.contains("Claims Processing (CAM)"));
    }

    #[test]
    fn test_unrelated_query_is_no_match() {
        let kb = kb();
        assert_eq!(find_relevant_answer("What's the weather today?", &kb), QueryResult::NoMatch);
        assert_eq!(find_relevant_answer("hello", &kb), QueryResult::NoMatch);
        assert_eq!(find_relevant_answer("", &kb), QueryResult::NoMatch);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let kb = kb();
        assert_eq!(
            find_relevant_answer("What Does EVA Do?", &kb),
            find_relevant_answer("what does eva do?", &kb)
        );
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let kb = kb();
        let matcher = Matcher::default();
        let first = matcher.find("How does PHIL work?", &kb);
        for _ in 0..3 {
            assert_eq!(matcher.find("How does PHIL work?", &kb), first);
        }
    }

    #[test]
    fn test_ties_go_to_first_entry() {
        let kb = KnowledgeBase::new(vec![
            KnowledgeEntry::new("alpha", "first"),
            KnowledgeEntry::new("beta", "second"),
            KnowledgeEntry::new("gamma", "third"),
        ]);
        let scorer = FixedScorer(vec![("alpha", 50), ("beta", 90), ("gamma", 90)]);
        let matcher = Matcher::new(Arc::new(scorer), DEFAULT_THRESHOLD);
        assert_eq!(matcher.find("anything", &kb), QueryResult::Answer("second".into()));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let kb = KnowledgeBase::new(vec![KnowledgeEntry::new("only", "answer")]);
        let at = Matcher::new(Arc::new(FixedScorer(vec![("only", 70)])), 70);
        assert_eq!(at.find("q", &kb), QueryResult::NoMatch);
        let above = Matcher::new(Arc::new(FixedScorer(vec![("only", 71)])), 70);
        assert_eq!(above.find("q", &kb), QueryResult::Answer("answer".into()));
    }

    #[test]
    fn test_empty_knowledge_base_is_no_match() {
        let kb = KnowledgeBase::new(Vec::new());
        assert_eq!(find_relevant_answer("What does EVA do?", &kb), QueryResult::NoMatch);
    }

    #[test]
    fn test_query_result_serializes_tagged() {
        let json = serde_json::to_value(QueryResult::Answer("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "answer", "answer": "x" }));
        let json = serde_json::to_value(QueryResult::NoMatch).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "no_match" }));
    }
}
