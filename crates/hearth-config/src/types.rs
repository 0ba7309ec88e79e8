//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//! webroot = "/static/"
//! static_dir = "./public"
//!
//! [session]
//! cookie_name = "FMKSession"
//! max_life_secs = 3600
//! gc_rate_secs = 60
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default static file URL prefix.
pub const DEFAULT_WEBROOT: &str = "/static/";

/// Root configuration structure.
///
/// All sections are optional so that partial configs can be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HearthConfig {
    /// HTTP server settings.
    pub server: Option<ServerSection>,

    /// Session manager settings.
    pub session: Option<SessionSection>,
}

impl HearthConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Merging is per section: a section present in `other` replaces ours.
    pub fn merge(&mut self, other: HearthConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.session.is_some() {
            self.session = other.session;
        }
    }

    /// Server section, or defaults if absent.
    pub fn server(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// Session section, or defaults if absent.
    pub fn session(&self) -> SessionSection {
        self.session.clone().unwrap_or_default()
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind to, `host:port`.
    pub bind: String,
    /// Enable request logging.
    pub request_logging: bool,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// URL prefix for static files.
    pub webroot: String,
    /// Directory to serve static files from.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            request_logging: true,
            request_timeout_secs: 30,
            webroot: DEFAULT_WEBROOT.to_string(),
            static_dir: None,
        }
    }
}

impl ServerSection {
    /// Parsed bind address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| ConfigError::InvalidValue {
            field: "server.bind".to_string(),
            reason: format!("{e}"),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `[session]` section.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Cookie `Domain` attribute. Empty or absent means none.
    pub domain: Option<String>,
    /// Cookie `Path` attribute. Empty or absent means none.
    pub path: Option<String>,
    /// Cookie `Secure` attribute.
    pub secure_cookie: bool,
    /// Cookie `HttpOnly` attribute.
    pub http_only: bool,
    /// Idle lifetime in seconds.
    pub max_life_secs: u64,
    /// Reaper interval in seconds.
    pub gc_rate_secs: u64,
    /// Base64 session key. Prefer the environment variable.
    pub key: Option<String>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: "FMKSession".to_string(),
            domain: None,
            path: None,
            secure_cookie: true,
            http_only: true,
            max_life_secs: 3600,
            gc_rate_secs: 60,
            key: None,
        }
    }
}

impl std::fmt::Debug for SessionSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSection")
            .field("cookie_name", &self.cookie_name)
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("secure_cookie", &self.secure_cookie)
            .field("http_only", &self.http_only)
            .field("max_life_secs", &self.max_life_secs)
            .field("gc_rate_secs", &self.gc_rate_secs)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SessionSection {
    pub fn max_life(&self) -> Duration {
        Duration::from_secs(self.max_life_secs)
    }

    pub fn gc_rate(&self) -> Duration {
        Duration::from_secs(self.gc_rate_secs)
    }

    /// Whether a plaintext key is present in the file.
    pub fn has_plaintext_key(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
