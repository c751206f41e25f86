//! Loading a knowledge base from a JSON file: `[{"question": "...", "answer": "..."}, ...]`
//! or `{"questions": [...]}`.

use super::{KnowledgeBase, KnowledgeEntry};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid knowledge file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("knowledge file {0} contains no entries")]
    Empty(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KnowledgeFile {
    List(Vec<KnowledgeEntry>),
    Dataset { questions: Vec<KnowledgeEntry> },
}

impl KnowledgeBase {
    /// Parses a knowledge file body. `origin` is only used in error messages.
    pub fn from_json_str(body: &str, origin: &Path) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile =
            serde_json::from_str(body).map_err(|source| KnowledgeError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        let entries = match file {
            KnowledgeFile::List(entries) => entries,
            KnowledgeFile::Dataset { questions } => questions,
        };
        if entries.is_empty() {
            return Err(KnowledgeError::Empty(origin.to_path_buf()));
        }
        Ok(Self::new(entries))
    }

    /// Reads and parses the knowledge file at `path`.
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&body, path)?;
        tracing::info!(path = %path.display(), entries = kb.len(), "Knowledge base loaded");
        Ok(kb)
    }

    /// File at `path` when given, otherwise the built-in dataset.
    pub fn load(path: Option<&Path>) -> Result<Self, KnowledgeError> {
        match path {
            Some(p) => Self::load_json_path(p),
            None => {
                let kb = Self::builtin();
                tracing::debug!(entries = kb.len(), "Using built-in knowledge base");
                Ok(kb)
            }
        }
    }
}
