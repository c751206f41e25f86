//! support-core: knowledge base, fuzzy matcher, session history and configuration for the
//! support responder.
//!
//! The gateway and terminal add-ons build a [`Responder`] from [`CoreConfig`] and pass each
//! session's [`SessionHistory`] into it explicitly.

mod knowledge;
mod matcher;
mod responder;
mod session;
mod shared;

pub use knowledge::{builtin_entries, KnowledgeBase, KnowledgeEntry, KnowledgeError};

pub use matcher::{
    find_relevant_answer, Block, JaroWinkler, MatchDetail, Matcher, PartialRatio, QueryResult,
    Ratio, Scorer, ScorerRegistry, SequenceMatcher, UnknownScorer, DEFAULT_THRESHOLD,
    JARO_WINKLER, PARTIAL_RATIO, RATIO,
};

pub use responder::{
    Reply, Responder, ValidationError, DEFAULT_FALLBACK_ANSWER, DEFAULT_MIN_QUESTION_CHARS,
};

pub use session::{HistoryEntry, SessionHistory, DEFAULT_HISTORY_LIMIT};

pub use shared::{ConfigError, CoreConfig, DEFAULT_MAX_SESSIONS, ENV_CONFIG_PATH};
