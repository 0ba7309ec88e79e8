//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ServerError};

/// Default request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default URL prefix for static files.
pub const DEFAULT_WEBROOT: &str = "/static/";

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// URL prefix under which static files are served. Should end in `/`.
    pub webroot: String,

    /// Directory holding static files. `None` disables static serving.
    pub static_dir: Option<PathBuf>,

    /// Enable request logging.
    pub request_logging: bool,

    /// Requests running longer than this are aborted.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            webroot: DEFAULT_WEBROOT.to_string(),
            static_dir: None,
            request_logging: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the static file URL prefix. A trailing `/` is added if missing.
    pub fn with_webroot(mut self, webroot: impl Into<String>) -> Self {
        let mut webroot = webroot.into();
        if !webroot.ends_with('/') {
            webroot.push('/');
        }
        self.webroot = webroot;
        self
    }

    /// Serve static files from `dir`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check that the config can be turned into a router.
    ///
    /// The webroot becomes a route prefix, so it must be rooted and free of
    /// route syntax.
    pub fn validate(&self) -> Result<()> {
        if !self.webroot.starts_with('/') {
            return Err(ServerError::InvalidConfig(format!(
                "webroot '{}' must start with '/'",
                self.webroot
            )));
        }
        if self.webroot.contains(['{', '}']) {
            return Err(ServerError::InvalidConfig(format!(
                "webroot '{}' must not contain '{{' or '}}'",
                self.webroot
            )));
        }
        Ok(())
    }
}
