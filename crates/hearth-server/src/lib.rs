//! HTTP transport for hearth sessions.
//!
//! # Features
//!
//! - Session middleware binding each request to a cookie-backed session
//! - Static file serving with strict path resolution
//! - Plain-text responses with canned bodies
//! - Request logging
//!
//! # Example
//!
//! ```ignore
//! use hearth_server::{Server, ServerConfig};
//! use hearth_session::{SessionConfig, SessionManager};
//!
//! let sessions = SessionManager::new(SessionConfig::new().with_session_key(key));
//! let config = ServerConfig::new()
//!     .with_bind_address("127.0.0.1:8080".parse()?)
//!     .with_static_dir("./public");
//!
//! Server::new(config, sessions).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod response;
pub mod routes;
pub mod safe_path;
pub mod session_layer;
pub mod state;
pub mod static_files;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use logging::request_logging_middleware;
pub use safe_path::{PathError, resolve};
pub use session_layer::{CurrentSession, session_middleware};
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use hearth_session::SessionManager;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The hearth HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, sessions: SessionManager) -> Self {
        Self {
            state: AppState::new(config, sessions),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    ///
    /// Fails if the config cannot be routed, see [`ServerConfig::validate`].
    pub fn router(&self) -> Result<Router> {
        let config = self.state.config();
        config.validate()?;

        let mut router = Router::new()
            .merge(routes::health_routes())
            .merge(routes::session_routes().route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                session_layer::session_middleware,
            )));

        if config.static_dir.is_some() {
            let pattern = format!("{}{{*path}}", config.webroot);
            router = router.route(&pattern, get(static_files::static_handler));
        }

        Ok(router
            .fallback(|| async { response::not_found() })
            // Request logging (inner layer, sees the final status)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone()))
    }

    /// Run the server on the configured address until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = self.bind_address();
        self.run_on(addr).await
    }

    /// Run the server on a specific address until Ctrl-C.
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        self.state.config().validate()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// The session reaper runs for exactly as long as the server does.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.router()?;
        let reaper = self.state.sessions.spawn_reaper();

        info!(%addr, "Starting server");

        let result = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await;

        reaper.shutdown().await;
        info!("Server stopped");

        result.map_err(ServerError::Io)
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
