//! Visitor and session identity.
//!
//! A visitor id lives as long as the store keeps it. A session id is replaced
//! once the visitor has been inactive for [`SESSION_TIMEOUT_MINUTES`]. Time and storage
//! are injected so expiry can be tested without waiting.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Key-value storage for identity, e.g. browser local storage.
pub trait IdentityStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryIdentityStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value);
        }
    }
}

const VISITOR_KEY: &str = "visitor_id";
const SESSION_KEY: &str = "session_id";
const LAST_ACTIVITY_KEY: &str = "last_activity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub visitor_id: String,
    pub session_id: String,
    pub new_visitor: bool,
    pub new_session: bool,
}

pub struct IdentityProvider<C: Clock, S: IdentityStore> {
    clock: C,
    store: S,
    timeout: Duration,
}

impl<C: Clock, S: IdentityStore> IdentityProvider<C, S> {
    pub fn new(clock: C, store: S) -> Self {
        Self::with_timeout(clock, store, Duration::minutes(SESSION_TIMEOUT_MINUTES))
    }

    pub fn with_timeout(clock: C, store: S, timeout: Duration) -> Self {
        Self {
            clock,
            store,
            timeout,
        }
    }

    /// Records activity now and returns the current ids, creating them as needed.
    pub fn touch(&self) -> Identity {
        let now = self.clock.now();

        let (visitor_id, new_visitor) = match self.store.get(VISITOR_KEY) {
            Some(id) => (id, false),
            None => {
                let id = Uuid::new_v4().to_string();
                self.store.set(VISITOR_KEY, id.clone());
                (id, true)
            }
        };

        let last_activity = self
            .store
            .get(LAST_ACTIVITY_KEY)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc));
        let expired = last_activity.map_or(true, |last| now - last > self.timeout);

        let (session_id, new_session) = match self.store.get(SESSION_KEY) {
            Some(id) if !expired => (id, false),
            _ => {
                let id = Uuid::new_v4().to_string();
                self.store.set(SESSION_KEY, id.clone());
                (id, true)
            }
        };

        self.store.set(LAST_ACTIVITY_KEY, now.to_rfc3339());

        if new_session {
            tracing::debug!(%visitor_id, %session_id, new_visitor, "Started analytics session");
        }

        Identity {
            visitor_id,
            session_id,
            new_visitor,
            new_session,
        }
    }
}
