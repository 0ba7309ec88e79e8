//! Configuration for the session manager.

use std::fmt;
use std::time::Duration;

use crate::crypto::KEY_LEN;
use crate::error::{Error, Result};

/// Default cookie name for the session identifier.
pub const DEFAULT_COOKIE_NAME: &str = "FMKSession";

/// Placeholder signing key. The manager refuses to issue sessions while the
/// configured key still equals this value.
pub const PLACEHOLDER_SESSION_KEY: &[u8; KEY_LEN] = b"PleaseChangeMe;MoreRandom=Better";

/// Default idle lifetime before a session is reaped (1 hour).
pub const DEFAULT_MAX_LIFE: Duration = Duration::from_secs(3600);

/// Default interval between reaper passes.
pub const DEFAULT_GC_RATE: Duration = Duration::from_secs(60);

/// Lower bound on the reaper interval so a zero duration cannot spin.
pub const MIN_GC_RATE: Duration = Duration::from_millis(10);

/// Configuration for the session manager.
#[derive(Clone)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session identifier.
    pub cookie_name: String,

    /// Symmetric key used to seal session identifiers.
    pub session_key: Vec<u8>,

    /// Cookie `Domain` attribute.
    pub domain: Option<String>,

    /// Cookie `Path` attribute.
    pub path: Option<String>,

    /// Cookie `Secure` attribute. Leave on for anything served over TLS.
    pub secure_cookie: bool,

    /// Cookie `HttpOnly` attribute.
    pub http_only: bool,

    /// Sessions idle for longer than this are evicted.
    pub max_life: Duration,

    /// Interval between reaper passes.
    pub gc_rate: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_key: PLACEHOLDER_SESSION_KEY.to_vec(),
            domain: None,
            path: None,
            secure_cookie: true,
            http_only: true,
            max_life: DEFAULT_MAX_LIFE,
            gc_rate: DEFAULT_GC_RATE,
        }
    }
}

// The key never shows up in logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("session_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("secure_cookie", &self.secure_cookie)
            .field("http_only", &self.http_only)
            .field("max_life", &self.max_life)
            .field("gc_rate", &self.gc_rate)
            .finish()
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the signing key.
    pub fn with_session_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Set the cookie domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Enable or disable the `Secure` cookie attribute.
    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Enable or disable the `HttpOnly` cookie attribute.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the idle lifetime.
    pub fn with_max_life(mut self, max_life: Duration) -> Self {
        self.max_life = max_life;
        self
    }

    /// Set the reaper interval.
    pub fn with_gc_rate(mut self, gc_rate: Duration) -> Self {
        self.gc_rate = gc_rate;
        self
    }

    /// Whether the signing key is still the built-in placeholder.
    pub fn is_placeholder_key(&self) -> bool {
        self.session_key.as_slice() == PLACEHOLDER_SESSION_KEY.as_slice()
    }

    /// Reaper interval, clamped to [`MIN_GC_RATE`].
    pub fn effective_gc_rate(&self) -> Duration {
        self.gc_rate.max(MIN_GC_RATE)
    }

    /// Cookie attributes stamped onto new sessions.
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            name: self.cookie_name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
            secure: self.secure_cookie,
            http_only: self.http_only,
        }
    }

    /// Apply a set of options on top of this configuration.
    ///
    /// Nothing is changed if the options carry a key of the wrong length.
    pub fn apply(&mut self, options: SessionOptions) -> Result<()> {
        if let Some(ref key) = options.session_key
            && key.len() != KEY_LEN
        {
            return Err(Error::InvalidKeyLength {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }

        if let Some(name) = options.session_name {
            self.cookie_name = name;
        }
        if let Some(key) = options.session_key {
            self.session_key = key;
        }
        if let Some(domain) = options.domain {
            self.domain = Some(domain).filter(|d| !d.is_empty());
        }
        if let Some(path) = options.path {
            self.path = Some(path).filter(|p| !p.is_empty());
        }
        if let Some(secure) = options.secure_cookie {
            self.secure_cookie = secure;
        }
        if let Some(http_only) = options.http_only {
            self.http_only = http_only;
        }
        if let Some(gc_rate) = options.gc_rate {
            self.gc_rate = gc_rate;
        }
        if let Some(max_life) = options.max_life {
            self.max_life = max_life;
        }
        Ok(())
    }
}

/// Partial update for a running manager. Unset fields are left alone.
#[derive(Default, Clone)]
pub struct SessionOptions {
    pub session_name: Option<String>,
    pub session_key: Option<Vec<u8>>,
    /// An empty string clears the attribute.
    pub domain: Option<String>,
    /// An empty string clears the attribute.
    pub path: Option<String>,
    pub secure_cookie: Option<bool>,
    pub http_only: Option<bool>,
    pub gc_rate: Option<Duration>,
    pub max_life: Option<Duration>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("session_name", &self.session_name)
            .field("session_key", &self.session_key.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("secure_cookie", &self.secure_cookie)
            .field("http_only", &self.http_only)
            .field("gc_rate", &self.gc_rate)
            .field("max_life", &self.max_life)
            .finish()
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = Some(name.into());
        self
    }

    pub fn session_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = Some(secure);
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn gc_rate(mut self, gc_rate: Duration) -> Self {
        self.gc_rate = Some(gc_rate);
        self
    }

    pub fn max_life(mut self, max_life: Duration) -> Self {
        self.max_life = Some(max_life);
        self
    }
}

/// Cookie presentation attributes copied onto each session at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}
