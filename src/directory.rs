// src/directory.rs
//! Concurrent registry of live sessions, keyed by game id.
//!
//! Each session sits behind its own lock: mutations of one game are
//! serialized while reads and other games proceed in parallel.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ArenaConfig;
use crate::error::DirectoryError;
use crate::session::Session;

pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Default)]
pub struct SessionDirectory {
    sessions: DashMap<String, SharedSession>,
    config: ArenaConfig,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        SessionDirectory { sessions: DashMap::new(), config }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Registers a fresh session under `id`.
    pub fn create(&self, id: &str) -> Result<SharedSession, DirectoryError> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(_) => Err(DirectoryError::DuplicateGame(id.to_string())),
            Entry::Vacant(slot) => {
                let session = self.fresh(id);
                slot.insert(Arc::clone(&session));
                Ok(session)
            }
        }
    }

    /// Looks up `id`, registering a fresh session when none exists yet.
    pub fn get_or_create(&self, id: &str) -> SharedSession {
        let entry = self.sessions.entry(id.to_string()).or_insert_with(|| self.fresh(id));
        Arc::clone(entry.value())
    }

    fn fresh(&self, id: &str) -> SharedSession {
        tracing::info!(game = id, "session created");
        Arc::new(RwLock::new(Session::with_config(id, &self.config)))
    }

    pub fn remove(&self, id: &str) -> Result<SharedSession, DirectoryError> {
        let (_, session) = self
            .sessions
            .remove(id)
            .ok_or_else(|| DirectoryError::UnknownGame(id.to_string()))?;
        tracing::info!(game = id, "session removed");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Result<SharedSession, DirectoryError> {
        // Clone the handle out so the shard guard is dropped before locking.
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DirectoryError::UnknownGame(id.to_string()))
    }

    /// Runs `f` with exclusive access to the session.
    pub fn mutate<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Result<R, DirectoryError> {
        let session = self.get(id)?;
        let mut guard = session.write();
        Ok(f(&mut guard))
    }

    /// Runs `f` with shared access to the session.
    pub fn read<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> Result<R, DirectoryError> {
        let session = self.get(id)?;
        let guard = session.read();
        Ok(f(&guard))
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
