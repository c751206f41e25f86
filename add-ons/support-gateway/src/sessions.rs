//! In-memory session histories keyed by UUID. Nothing here survives a restart.
//!
//! The store holds at most `max_sessions` histories; opening a new one at capacity evicts the
//! session that was used least recently.

use dashmap::DashMap;
use std::time::Instant;
use support_core::{HistoryEntry, SessionHistory};
use uuid::Uuid;

struct Slot {
    history: SessionHistory,
    last_seen: Instant,
}

pub(crate) struct SessionStore {
    sessions: DashMap<Uuid, Slot>,
    history_limit: usize,
    max_sessions: usize,
}

impl SessionStore {
    pub(crate) fn new(history_limit: usize, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            history_limit,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Parses a client-supplied session id; missing or malformed ids get a fresh one.
    pub(crate) fn resolve(&self, raw: Option<&str>) -> Uuid {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4)
    }

    /// Runs `f` against the session's history, creating an empty one on first use.
    pub(crate) fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionHistory) -> R) -> R {
        if !self.sessions.contains_key(&id) {
            self.evict_to_fit();
        }
        let mut slot = self.sessions.entry(id).or_insert_with(|| Slot {
            history: SessionHistory::new(self.history_limit),
            last_seen: Instant::now(),
        });
        slot.last_seen = Instant::now();
        f(&mut slot.value_mut().history)
    }

    /// Drops least-recently-used sessions until one more fits.
    fn evict_to_fit(&self) {
        while self.sessions.len() >= self.max_sessions {
            // Collect the key first; removing while an iterator guard is alive deadlocks the shard.
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|slot| slot.last_seen)
                .map(|slot| *slot.key());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    tracing::debug!(session_id = %id, "Evicted idle session");
                }
                None => break,
            }
        }
    }

    /// Most-recent-first copy of a session's history, `None` for unknown sessions.
    pub(crate) fn snapshot(&self, id: &Uuid) -> Option<Vec<HistoryEntry>> {
        self.sessions
            .get(id)
            .map(|slot| slot.history.recent().cloned().collect())
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }

    pub(crate) fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_valid_ids_and_replaces_garbage() {
        let store = SessionStore::new(5, 10);
        let id = Uuid::new_v4();
        assert_eq!(store.resolve(Some(&id.to_string())), id);
        assert_ne!(store.resolve(Some("not-a-uuid")), id);
        assert_ne!(store.resolve(None), store.resolve(None));
    }

    #[test]
    fn test_sessions_do_not_share_history() {
        let store = SessionStore::new(5, 10);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.with_session(a, |h| h.record("q", "a"));
        store.with_session(b, |_| ());
        assert_eq!(store.snapshot(&a).unwrap().len(), 1);
        assert!(store.snapshot(&b).unwrap().is_empty());
        assert!(store.snapshot(&Uuid::new_v4()).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_full_store_evicts_least_recently_used_session() {
        let store = SessionStore::new(5, 2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.with_session(a, |h| h.record("first", "1"));
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.with_session(b, |h| h.record("second", "2"));
        std::thread::sleep(std::time::Duration::from_millis(2));
        // Touching `a` makes `b` the idle one.
        store.with_session(a, |h| h.record("again", "3"));
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.with_session(c, |_| ());

        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot(&a).unwrap().len(), 2);
        assert!(store.snapshot(&b).is_none());
        assert!(store.snapshot(&c).is_some());
    }

    #[test]
    fn test_store_never_grows_past_capacity() {
        let store = SessionStore::new(5, 3);
        for _ in 0..50 {
            store.with_session(Uuid::new_v4(), |h| h.record("q", "a"));
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.max_sessions(), 3);
    }
}
