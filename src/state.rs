//! In-memory session store
//!
//! Uploaded datasets are ephemeral: kept under a random id, re-parsed on
//! every upload, and dropped once they expire or the store hits capacity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Dataset;

/// One uploaded dataset
#[derive(Debug)]
pub struct Session {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub dataset: Dataset,
}

struct Entry {
    seq: u64,
    session: Arc<Session>,
}

/// TTL- and capacity-bounded map of uploaded datasets
pub struct SessionStore {
    sessions: DashMap<Uuid, Entry>,
    next_seq: AtomicU64,
    ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(ttl_minutes: u64, capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            next_seq: AtomicU64::new(0),
            ttl: Duration::minutes(ttl_minutes as i64),
            capacity: capacity.max(1),
        }
    }

    /// Store a dataset and hand back its session id.
    pub fn insert(&self, filename: String, dataset: Dataset) -> Uuid {
        self.evict();

        let id = Uuid::new_v4();
        let entry = Entry {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            session: Arc::new(Session {
                filename,
                uploaded_at: Utc::now(),
                dataset,
            }),
        };
        self.sessions.insert(id, entry);
        id
    }

    /// Look up a live session; expired entries are dropped on access.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        let expired = match self.sessions.get(id) {
            Some(entry) => self.is_expired(&entry.session),
            None => return None,
        };
        if expired {
            self.sessions.remove(id);
            return None;
        }
        self.sessions.get(id).map(|entry| entry.session.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.uploaded_at >= self.ttl
    }

    /// Drop expired entries, then the oldest entries until one slot is free.
    fn evict(&self) {
        self.sessions
            .retain(|_, entry| !self.is_expired(&entry.session));

        while self.sessions.len() >= self.capacity {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.seq)
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            rows: Vec::new(),
            unparsed_timestamps: 0,
            min_created: None,
            max_created: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = SessionStore::new(60, 8);
        let id = store.insert("export.csv".into(), dataset());
        let session = store.get(&id).unwrap();
        assert_eq!(session.filename, "export.csv");
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let store = SessionStore::new(0, 8);
        let id = store.insert("export.csv".into(), dataset());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = SessionStore::new(60, 2);
        let first = store.insert("a.csv".into(), dataset());
        let second = store.insert("b.csv".into(), dataset());
        let third = store.insert("c.csv".into(), dataset());

        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }
}
