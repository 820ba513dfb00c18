use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::Session;

/// Concurrency-safe session map. Turns for different sessions proceed
/// independently; the lock only covers map access, never a whole turn.
/// `get` hands out a clone and `put` overwrites, so overlapping turns for
/// the same id resolve as last-write-wins.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    pub fn get_or_create(&self, id: &str) -> Session {
        self.get(id).unwrap_or_else(|| Session::new(id))
    }

    pub fn put(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
