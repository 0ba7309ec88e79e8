//! Start command - launches the hearth server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use tracing::{info, warn};

use hearth_config::{HearthConfig, ResolvedKey, SESSION_KEY_ENV};
use hearth_server::{Server, ServerConfig};
use hearth_session::{SessionConfig, SessionManager};

use super::Context;

/// Arguments for the start command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to config file (overrides default discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind to, host:port (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Directory to serve static files from (overrides config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// URL prefix for static files (overrides config)
    #[arg(long)]
    pub webroot: Option<String>,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let loaded = hearth_config::load_config(args.config.as_deref())?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    if ctx.verbose {
        for path in loaded.loaded_from() {
            info!(path = %path.display(), "Loaded config");
        }
    }

    let server_config = server_config(&args, &loaded.config)?;

    let session = loaded.config.session();
    let key = hearth_config::resolve_session_key(session.key.as_deref())?;
    if let Some(ref key) = key {
        info!(source = %key.source, "Session key resolved");
    }
    let session_config = session_config(&loaded.config, key)?;

    if !session_config.secure_cookie {
        warn!("Session cookies will be sent without the Secure attribute");
    }

    let sessions = SessionManager::new(session_config);
    Server::new(server_config, sessions).run().await?;
    Ok(())
}

/// Build the server config from the file, then apply CLI overrides.
fn server_config(args: &StartArgs, config: &HearthConfig) -> Result<ServerConfig> {
    let section = config.server();

    let bind_address: SocketAddr = match args.bind {
        Some(ref bind) => bind
            .parse()
            .with_context(|| format!("invalid --bind address '{}'", bind))?,
        None => section.bind_address()?,
    };

    let mut server = ServerConfig::new()
        .with_bind_address(bind_address)
        .with_request_logging(section.request_logging)
        .with_request_timeout(section.request_timeout())
        .with_webroot(args.webroot.clone().unwrap_or(section.webroot));

    if let Some(dir) = args.static_dir.clone().or(section.static_dir) {
        server = server.with_static_dir(dir);
    }
    server.validate()?;
    Ok(server)
}

/// Build the session config. A session key is required.
fn session_config(config: &HearthConfig, key: Option<ResolvedKey>) -> Result<SessionConfig> {
    let Some(key) = key else {
        bail!(
            "no session key configured; generate one with `hearth keygen` and export it as {}",
            SESSION_KEY_ENV
        );
    };

    let section = config.session();
    let mut session = SessionConfig::new()
        .with_cookie_name(section.cookie_name.clone())
        .with_session_key(key.bytes)
        .with_secure_cookie(section.secure_cookie)
        .with_http_only(section.http_only)
        .with_max_life(section.max_life())
        .with_gc_rate(section.gc_rate());

    if let Some(domain) = section.domain.filter(|d| !d.is_empty()) {
        session = session.with_domain(domain);
    }
    if let Some(path) = section.path.filter(|p| !p.is_empty()) {
        session = session.with_path(path);
    }

    if session.is_placeholder_key() {
        bail!("the configured session key is the built-in placeholder; generate a new one with `hearth keygen`");
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_config::SecretSource;
    use hearth_session::PLACEHOLDER_SESSION_KEY;
    use std::time::Duration;

    fn args() -> StartArgs {
        StartArgs {
            config: None,
            bind: None,
            static_dir: None,
            webroot: None,
        }
    }

    fn key(bytes: Vec<u8>) -> Option<ResolvedKey> {
        Some(ResolvedKey {
            bytes,
            source: SecretSource::EnvVar(SESSION_KEY_ENV.to_string()),
        })
    }

    #[test]
    fn test_server_config_from_file() {
        let config = HearthConfig::from_toml(
            "[server]\nbind = \"0.0.0.0:9000\"\nwebroot = \"/get\"\nstatic_dir = \"/srv\"\n",
        )
        .unwrap();
        let server = server_config(&args(), &config).unwrap();

        assert_eq!(server.bind_address.port(), 9000);
        assert_eq!(server.webroot, "/get/");
        assert_eq!(server.static_dir, Some(PathBuf::from("/srv")));
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = HearthConfig::from_toml("[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();
        let args = StartArgs {
            bind: Some("127.0.0.1:7000".to_string()),
            static_dir: Some(PathBuf::from("./public")),
            webroot: Some("/files/".to_string()),
            ..args()
        };
        let server = server_config(&args, &config).unwrap();

        assert_eq!(server.bind_address.port(), 7000);
        assert_eq!(server.webroot, "/files/");
        assert_eq!(server.static_dir, Some(PathBuf::from("./public")));
    }

    #[test]
    fn test_invalid_bind_is_error() {
        let args = StartArgs {
            bind: Some("nowhere".to_string()),
            ..args()
        };
        assert!(server_config(&args, &HearthConfig::new()).is_err());
    }

    #[test]
    fn test_unrooted_webroot_is_error() {
        let config = HearthConfig::from_toml("[server]\nwebroot = \"static\"\n").unwrap();
        let err = server_config(&args(), &config).unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));

        let args = StartArgs {
            webroot: Some("/{name}/".to_string()),
            ..args()
        };
        assert!(server_config(&args, &HearthConfig::new()).is_err());
    }

    #[test]
    fn test_session_config_requires_key() {
        let err = session_config(&HearthConfig::new(), None).unwrap_err();
        assert!(err.to_string().contains(SESSION_KEY_ENV));

        let err =
            session_config(&HearthConfig::new(), key(PLACEHOLDER_SESSION_KEY.to_vec())).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_session_config_from_file() {
        let config = HearthConfig::from_toml(
            "[session]\ncookie_name = \"sid\"\ndomain = \"\"\npath = \"/\"\nmax_life_secs = 90\n",
        )
        .unwrap();
        let session = session_config(&config, key(vec![7; 32])).unwrap();

        assert_eq!(session.cookie_name, "sid");
        assert_eq!(session.domain, None);
        assert_eq!(session.path.as_deref(), Some("/"));
        assert_eq!(session.max_life, Duration::from_secs(90));
        assert_eq!(session.session_key, vec![7; 32]);
        assert!(!session.is_placeholder_key());
    }
}
