//! Per-session exchange history. Owned by the caller and passed explicitly into the responder.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of exchanges kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// One question as entered and the answer shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

/// Bounded history; the oldest exchange is evicted once `limit` is reached.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl SessionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.limit == 0 {
            return;
        }
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// Most recent exchange first.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
