//! A single session: identity, attribute bag, and freshness timestamp.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cookie::Cookie;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::config::CookieSettings;

/// Handle to a session shared between the store and request handlers.
///
/// Evicting a session removes it from the store; handles already given out
/// stay usable until dropped.
pub type SharedSession = Arc<RwLock<Session>>;

/// Server-side session state.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    attributes: HashMap<String, String>,
    last_update: Instant,
    created_at: DateTime<Utc>,
    cookie: CookieSettings,
}

impl Session {
    /// Create a session. Creation stamps `last_update`.
    pub fn new(id: impl Into<String>, cookie: CookieSettings) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
            last_update: Instant::now(),
            created_at: Utc::now(),
            cookie,
        }
    }

    /// Wrap this session in a [`SharedSession`].
    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute. Removing a missing key is not an error.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_update = Instant::now();
    }

    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time since the last update, as of `now`.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_update)
    }

    /// Cookie that binds a client to this session.
    pub fn cookie(&self) -> SessionCookie {
        SessionCookie {
            name: self.cookie.name.clone(),
            value: self.id.clone(),
            path: self.cookie.path.clone(),
            domain: self.cookie.domain.clone(),
            secure: self.cookie.secure,
            http_only: self.cookie.http_only,
        }
    }
}

/// Cookie descriptor for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl SessionCookie {
    /// Build the cookie.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), self.value.clone()))
            .secure(self.secure)
            .http_only(self.http_only);
        if let Some(ref path) = self.path {
            builder = builder.path(path.clone());
        }
        if let Some(ref domain) = self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        self.to_cookie().to_string()
    }
}
