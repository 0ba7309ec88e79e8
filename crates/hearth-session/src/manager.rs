//! Session manager: cookie protocol, identifier checks, and expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, trace, warn};

use crate::config::{SessionConfig, SessionOptions};
use crate::cookies::RequestCookies;
use crate::error::{Error, Result};
use crate::id;
use crate::session::{Session, SessionCookie, SharedSession};
use crate::store::{MemoryStore, SessionStore};

/// Upper bound on identifier generation attempts for one new session.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Outcome of [`SessionManager::get_or_create_session`].
#[derive(Debug, Clone)]
pub struct SessionLookup {
    /// The session bound to the request.
    pub session: SharedSession,

    /// Cookie to send back, if the client's cookie is missing or stale.
    pub set_cookie: Option<SessionCookie>,

    /// Whether the session was created by this lookup.
    pub is_new: bool,
}

/// State protected by the manager's lock.
struct ManagerInner<S: SessionStore> {
    config: SessionConfig,
    store: S,
}

impl<S: SessionStore> ManagerInner<S> {
    fn new_session(&self, id: String) -> SharedSession {
        Session::new(id, self.config.cookie_settings()).into_shared()
    }

    /// Insert a new session, reusing `reuse` as its identifier when given.
    fn create_session(&mut self, reuse: Option<String>) -> Result<SharedSession> {
        if let Some(id) = reuse {
            let session = self.new_session(id.clone());
            self.store.put(&id, session.clone())?;
            debug!(sessions = self.store.len(), "Session recreated under presented id");
            return Ok(session);
        }

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = id::generate_session_id(&self.config.session_key)
                .inspect_err(|e| error!(error = %e, "Failed to generate session id"))?;

            let session = self.new_session(id.clone());
            match self.store.put(&id, session.clone()) {
                Ok(()) => {
                    debug!(attempt, sessions = self.store.len(), "Session created");
                    return Ok(session);
                }
                Err(Error::IdentifierInUse) => {
                    warn!(attempt, "Generated session id already in use, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        error!(attempts = MAX_ID_ATTEMPTS, "Gave up generating a unique session id");
        Err(Error::IdentifierInUse)
    }
}

/// Issues, validates, and expires cookie-bound sessions.
///
/// A single lock guards the store and the configuration, so a lookup
/// (validate, then find or create) is atomic with respect to other lookups
/// and to reaper passes. Cloning yields another handle to the same manager.
pub struct SessionManager<S: SessionStore = MemoryStore> {
    inner: Arc<Mutex<ManagerInner<S>>>,
}

impl SessionManager<MemoryStore> {
    /// Create a manager backed by an in-memory store.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a manager backed by `store`.
    pub fn with_store(config: SessionConfig, store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManagerInner { config, store })),
        }
    }

    /// Update configuration.
    ///
    /// Changing the key invalidates every outstanding cookie; those clients
    /// are handed new sessions on their next request.
    pub async fn configure(&self, options: SessionOptions) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let rotates_key = options.session_key.is_some();
        inner.config.apply(options)?;
        debug!(rotates_key, config = ?inner.config, "Session manager reconfigured");
        Ok(())
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> SessionConfig {
        self.inner.lock().await.config.clone()
    }

    /// Resolve the session for a request, creating one when needed.
    ///
    /// A missing, malformed, forged, or stale cookie yields a new session and a
    /// cookie to set. Only [`Error::SessionKeyUnset`] and store/crypto failures
    /// are returned as errors.
    pub async fn get_or_create_session(&self, cookies: &RequestCookies) -> Result<SessionLookup> {
        let mut inner = self.inner.lock().await;

        if inner.config.is_placeholder_key() {
            warn!("Refusing to issue sessions with the placeholder session key");
            return Err(Error::SessionKeyUnset);
        }

        let mut reuse = None;
        if let Some(presented) = cookies.get(&inner.config.cookie_name) {
            match id::validate_session_id(presented, &inner.config.session_key) {
                Ok(_) => {
                    if let Some(session) = inner.store.get(presented)? {
                        session.write().touch();
                        trace!("Session found");
                        return Ok(SessionLookup {
                            session,
                            set_cookie: None,
                            is_new: false,
                        });
                    }
                    debug!("Valid session id not in store");
                    reuse = Some(presented.to_string());
                }
                Err(e) if e.is_rejected_identifier() => {
                    debug!(error = %e, "Rejected session cookie");
                }
                Err(e) => return Err(e),
            }
        }

        let session = inner.create_session(reuse)?;
        let cookie = session.read().cookie();
        Ok(SessionLookup {
            session,
            set_cookie: Some(cookie),
            is_new: true,
        })
    }

    /// Fetch a live session by identifier.
    ///
    /// The identifier is validated first; a valid identifier with no stored
    /// session fails with [`Error::IdentifierMissing`].
    pub async fn get_session(&self, id: &str) -> Result<SharedSession> {
        let inner = self.inner.lock().await;
        id::validate_session_id(id, &inner.config.session_key)?;

        let session = inner
            .store
            .get(id)?
            .ok_or_else(|| Error::IdentifierMissing(id.to_string()))?;
        session.write().touch();
        Ok(session)
    }

    /// Remove a session. Removing an absent session is not an error.
    pub async fn destroy_session(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.store.delete(id)?.is_some() {
            debug!(sessions = inner.store.len(), "Session destroyed");
        }
        Ok(())
    }

    /// Evict every session idle for longer than `max_life`.
    ///
    /// Returns the number of sessions evicted.
    pub async fn reap_expired(&self, max_life: Duration) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        let expired: Vec<String> = inner
            .store
            .scan()?
            .into_iter()
            .filter(|(_, session)| session.read().idle_for(now) > max_life)
            .map(|(id, _)| id)
            .collect();

        for id in &expired {
            inner.store.delete(id)?;
        }

        let count = expired.len();
        if count > 0 {
            debug!(
                count,
                remaining = inner.store.len(),
                "Reaped expired sessions"
            );
        }
        Ok(count)
    }

    /// Evict expired sessions using the configured `max_life`.
    pub async fn reap(&self) -> Result<usize> {
        let max_life = self.inner.lock().await.config.max_life;
        self.reap_expired(max_life).await
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.store.is_empty()
    }

    /// Current statistics.
    pub async fn stats(&self) -> ManagerStats {
        let inner = self.inner.lock().await;
        ManagerStats {
            sessions: inner.store.len(),
            max_life: inner.config.max_life,
            gc_rate: inner.config.effective_gc_rate(),
        }
    }

    /// Reaper interval currently in effect.
    pub(crate) async fn gc_rate(&self) -> Duration {
        self.inner.lock().await.config.effective_gc_rate()
    }
}

impl<S: SessionStore> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Manager statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerStats {
    /// Live sessions in the store.
    pub sessions: usize,

    /// Idle lifetime before eviction.
    pub max_life: Duration,

    /// Interval between reaper passes.
    pub gc_rate: Duration,
}
