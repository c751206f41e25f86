//! Presentation-independent shell: validation gate, matching, fallback and history recording.

use crate::knowledge::KnowledgeBase;
use crate::matcher::{MatchDetail, Matcher};
use crate::session::SessionHistory;
use serde::Serialize;

/// Shown when no entry clears the threshold.
pub const DEFAULT_FALLBACK_ANSWER: &str = "I'm sorry, I don't have specific information about that. Could you please rephrase or ask another question about Thoughtful AI's agents?";

/// Minimum trimmed question length, in characters.
pub const DEFAULT_MIN_QUESTION_CHARS: usize = 3;

/// Input rejected before matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    Empty,
    #[error("Please enter a valid question (at least {min} characters).")]
    TooShort { min: usize },
}

/// Answer shown to the user and, when a knowledge entry matched, which one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub answer: String,
    pub matched: Option<MatchDetail>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.matched.is_none()
    }
}

/// Ties a knowledge base and matcher to the user-facing policy (validation and fallback).
#[derive(Debug, Clone)]
pub struct Responder {
    knowledge: KnowledgeBase,
    matcher: Matcher,
    fallback_answer: String,
    min_question_chars: usize,
}

impl Responder {
    pub fn new(knowledge: KnowledgeBase, matcher: Matcher) -> Self {
        Self {
            knowledge,
            matcher,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            min_question_chars: DEFAULT_MIN_QUESTION_CHARS,
        }
    }

    pub fn with_fallback_answer(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_answer = fallback.into();
        self
    }

    pub fn with_min_question_chars(mut self, min: usize) -> Self {
        self.min_question_chars = min;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn fallback_answer(&self) -> &str {
        &self.fallback_answer
    }

    /// Rejects empty input and input shorter than the minimum after trimming.
    pub fn validate<'q>(&self, input: &'q str) -> Result<&'q str, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        if trimmed.chars().count() < self.min_question_chars {
            return Err(ValidationError::TooShort {
                min: self.min_question_chars,
            });
        }
        Ok(trimmed)
    }

    /// Answers without touching any history.
    pub fn answer(&self, input: &str) -> Result<Reply, ValidationError> {
        self.validate(input)?;
        let matched = self.matcher.best_match(input, &self.knowledge);
        let answer = matched
            .as_ref()
            .map(|d| d.answer.clone())
            .unwrap_or_else(|| self.fallback_answer.clone());
        Ok(Reply { answer, matched })
    }

    /// Answers and records the exchange (question as entered) in `history`.
    pub fn ask(&self, history: &mut SessionHistory, input: &str) -> Result<Reply, ValidationError> {
        let reply = self.answer(input)?;
        history.record(input, reply.answer.clone());
        tracing::info!(
            matched = !reply.is_fallback(),
            history_len = history.len(),
            "Question answered"
        );
        Ok(reply)
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin(), Matcher::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_records_matched_answer() {
        let responder = Responder::default();
        let mut history = SessionHistory::default();
        let reply = responder.ask(&mut history, "What does EVA do?").unwrap();
        assert!(reply.answer.starts_with("EVA automates"));
        assert_eq!(reply.matched.as_ref().map(|d| d.index), Some(0));
        let last = history.recent().next().unwrap();
        assert_eq!(last.question, "What does EVA do?");
        assert_eq!(last.answer, reply.answer);
    }

    #[test]
    fn test_unmatched_question_gets_fallback() {
        let responder = Responder::default();
        let mut history = SessionHistory::default();
        let reply = responder.ask(&mut history, "What's the weather today?").unwrap();
        assert!(reply.is_fallback());
        assert_eq!(reply.answer, DEFAULT_FALLBACK_ANSWER);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_short_input_is_rejected_without_recording() {
        let responder = Responder::default();
        let mut history = SessionHistory::default();
        let err = responder.ask(&mut history, "ab").unwrap_err();
        assert_eq!(err, ValidationError::TooShort { min: 3 });
        assert_eq!(
            err.to_string(),
            "Please enter a valid question (at least 3 characters)."
        );
        assert_eq!(responder.ask(&mut history, "   ab  ").unwrap_err(), err);
        assert_eq!(responder.ask(&mut history, "  \t ").unwrap_err(), ValidationError::Empty);
        assert!(history.is_empty());
    }

    #[test]
    fn test_three_characters_pass_validation() {
        let responder = Responder::default();
        assert_eq!(responder.validate(" eva ").unwrap(), "eva");
        let reply = responder.answer("eva").unwrap();
        assert_eq!(reply.matched.map(|d| d.index), Some(0));
    }

    #[test]
    fn test_custom_policy() {
        let responder = Responder::default()
            .with_fallback_answer("no idea")
            .with_min_question_chars(5);
        assert!(responder.answer("abcd").is_err());
        assert_eq!(responder.answer("zzzzzz").unwrap().answer, "no idea");
    }
}
