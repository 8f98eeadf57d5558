//! The session module keeps each browser's parsed slides in memory between requests.
//!
//! Sessions are keyed by a random id carried in a cookie. Nothing is written to disk,
//! so every session is lost when the server stops or after it has been idle too long.

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

use crate::constants::SESSION_COOKIE_NAME;
use crate::deck::Theme;
use crate::slide::Slide;

pub type SessionId = Uuid;

/// What a browser session holds: the current slides and the theme chosen for them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionData {
    pub slides: Vec<Slide>,
    pub theme: Theme,
}

/// A session's data together with the time it was last used.
#[derive(Debug)]
struct StoredSession {
    data: SessionData,
    last_access: DateTime<Utc>,
}

impl StoredSession {
    fn new(data: SessionData) -> Self {
        Self {
            data,
            last_access: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_access = Utc::now();
    }
}

/// In-memory session storage.
///
/// Every read or write of a session refreshes its last access time; sessions left idle
/// are dropped by [`SessionStore::expire_idle`].
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, StoredSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session holding `data` and returns its id.
    pub fn create(&self, data: SessionData) -> SessionId {
        let id = Uuid::new_v4();
        debug!("Created session {id} with {} slides", data.slides.len());
        self.sessions.insert(id, StoredSession::new(data));
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionData> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.touch();
            entry.data.clone()
        })
    }

    /// Replaces the session's data wholesale, returning `false` if the session does not exist.
    pub fn replace(&self, id: &SessionId, data: SessionData) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                debug!("Replaced session {id} with {} slides", data.slides.len());
                entry.data = data;
                entry.touch();
                true
            }
            None => false,
        }
    }

    /// Replaces only the slides, keeping the session's theme.
    pub fn replace_slides(&self, id: &SessionId, slides: Vec<Slide>) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.data.slides = slides;
                entry.touch();
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &SessionId) -> Option<SessionData> {
        self.sessions.remove(id).map(|(_, stored)| stored.data)
    }

    /// Drops every session last used before `cutoff` and returns how many were dropped.
    pub fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, stored| {
            let keep = stored.last_access >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Drops every session that has not been used for `max_idle`.
    pub fn expire_idle(&self, max_idle: Duration) -> usize {
        self.remove_idle_since(Utc::now() - max_idle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Reads the session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the browser to a session.
pub fn session_cookie(id: &SessionId) -> String {
    format!("{SESSION_COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that makes the browser forget its session.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
