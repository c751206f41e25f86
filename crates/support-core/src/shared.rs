//! Configuration shared by the gateway and terminal add-ons.

use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::matcher::{Matcher, ScorerRegistry, UnknownScorer, DEFAULT_THRESHOLD, PARTIAL_RATIO};
use crate::responder::{Responder, DEFAULT_FALLBACK_ANSWER, DEFAULT_MIN_QUESTION_CHARS};
use crate::session::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Env var naming the config file (without extension is fine; `config` resolves `.toml`).
pub const ENV_CONFIG_PATH: &str = "SUPPORT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/support";
/// Cap on concurrently held gateway sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config load failed: {0}")]
    Load(#[from] config::ConfigError),
    #[error(transparent)]
    Scorer(#[from] UnknownScorer),
    #[error("match_threshold must be within 0..=100, got {0}")]
    Threshold(u8),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Application configuration. Load from TOML or env.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Title shown by the shells (e.g. "Thoughtful AI Customer Support").
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Exclusive minimum score (0–100) for an entry to match.
    pub match_threshold: u8,
    /// Registered scorer name: "partial_ratio", "ratio" or "jaro_winkler".
    pub scorer: String,
    /// Optional JSON knowledge file. The built-in dataset is used when unset.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    /// Exchanges kept per session.
    pub history_limit: usize,
    /// Sessions the gateway keeps before evicting the least recently used.
    pub max_sessions: usize,
    /// Minimum trimmed question length in characters.
    pub min_question_chars: usize,
    pub fallback_answer: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Thoughtful AI Customer Support".to_string(),
            port: 8001,
            match_threshold: DEFAULT_THRESHOLD,
            scorer: PARTIAL_RATIO.to_string(),
            knowledge_path: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            min_question_chars: DEFAULT_MIN_QUESTION_CHARS,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `SUPPORT_CONFIG` path >
    /// `config/support.toml` > defaults; `SUPPORT__*` variables override file values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Same as [`CoreConfig::load`] with an explicit file path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("match_threshold", i64::from(defaults.match_threshold))?
            .set_default("scorer", defaults.scorer)?
            .set_default("history_limit", defaults.history_limit as i64)?
            .set_default("max_sessions", defaults.max_sessions as i64)?
            .set_default("min_question_chars", defaults.min_question_chars as i64)?
            .set_default("fallback_answer", defaults.fallback_answer)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("SUPPORT").separator("__"));

        let config: Self = builder.build()?.try_deserialize()?;
        if config.match_threshold > 100 {
            return Err(ConfigError::Threshold(config.match_threshold));
        }
        Ok(config)
    }

    /// Matcher using the configured scorer and threshold.
    pub fn build_matcher(&self, registry: &ScorerRegistry) -> Result<Matcher, ConfigError> {
        let scorer = registry.resolve(&self.scorer)?;
        Ok(Matcher::new(scorer, self.match_threshold))
    }

    /// Loads the knowledge base and wires the responder from this config.
    pub fn build_responder(&self) -> Result<Responder, ConfigError> {
        let matcher = self.build_matcher(&ScorerRegistry::with_builtin())?;
        let knowledge = KnowledgeBase::load(self.knowledge_path.as_deref().map(Path::new))?;
        tracing::info!(
            scorer = matcher.scorer_name(),
            threshold = matcher.threshold(),
            entries = knowledge.len(),
            "Responder ready"
        );
        Ok(Responder::new(knowledge, matcher)
            .with_fallback_answer(self.fallback_answer.clone())
            .with_min_question_chars(self.min_question_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // `load_from` reads `SUPPORT__*`; tests that set it must not race the others.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let _env = env_guard();
        let config = CoreConfig::load_from(Path::new("/nonexistent/support")).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "app_name = \"Test Desk\"\nport = 4000\nmatch_threshold = 80\nscorer = \"ratio\"\nhistory_limit = 2"
        )
        .unwrap();
        let config = CoreConfig::load_from(file.path()).unwrap();
        assert_eq!(config.app_name, "Test Desk");
        assert_eq!(config.port, 4000);
        assert_eq!(config.match_threshold, 80);
        assert_eq!(config.scorer, "ratio");
        assert_eq!(config.history_limit, 2);
        assert_eq!(config.min_question_chars, DEFAULT_MIN_QUESTION_CHARS);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "match_threshold = 101").unwrap();
        let err = CoreConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Threshold(101)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "match_threshold = 60\nport = 4000").unwrap();

        std::env::set_var("SUPPORT__MATCH_THRESHOLD", "85");
        std::env::set_var("SUPPORT__MAX_SESSIONS", "12");
        let loaded = CoreConfig::load_from(file.path());
        std::env::remove_var("SUPPORT__MATCH_THRESHOLD");
        std::env::remove_var("SUPPORT__MAX_SESSIONS");

        let config = loaded.unwrap();
        assert_eq!(config.match_threshold, 85);
        assert_eq!(config.max_sessions, 12);
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_env_threshold_out_of_range_is_rejected() {
        let _env = env_guard();
        std::env::set_var("SUPPORT__MATCH_THRESHOLD", "150");
        let loaded = CoreConfig::load_from(Path::new("/nonexistent/support"));
        std::env::remove_var("SUPPORT__MATCH_THRESHOLD");
        assert!(matches!(loaded.unwrap_err(), ConfigError::Threshold(150)));
    }

    #[test]
    fn test_unknown_scorer_fails_to_build() {
        let config = CoreConfig {
            scorer: "cosine".to_string(),
            ..CoreConfig::default()
        };
        let err = config.build_responder().unwrap_err();
        assert_eq!(err.to_string(), "unknown scorer: cosine");
    }

    #[test]
    fn test_build_responder_applies_policy() {
        let config = CoreConfig {
            fallback_answer: "ask support".to_string(),
            ..CoreConfig::default()
        };
        let responder = config.build_responder().unwrap();
        assert_eq!(responder.knowledge().len(), 5);
        assert_eq!(responder.matcher().scorer_name(), PARTIAL_RATIO);
        assert_eq!(responder.answer("What's the weather today?").unwrap().answer, "ask support");
    }
}
