//! Immutable question/answer knowledge base.
//!
//! Loaded once at startup (built-in dataset or a JSON file) and shared read-only afterwards.
//! Entry order is significant: on equal scores the earlier entry wins.

mod bootstrap;
mod store;

pub use bootstrap::builtin_entries;
pub use store::KnowledgeError;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One canned question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered, immutable sequence of entries. Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Arc<[KnowledgeEntry]>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The five built-in Thoughtful AI support entries.
    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a KnowledgeEntry;
    type IntoIter = std::slice::Iter<'a, KnowledgeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
