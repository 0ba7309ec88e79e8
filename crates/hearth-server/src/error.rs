//! Error types for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::response;
use crate::safe_path::PathError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Session manager failure.
    #[error("Session error: {0}")]
    Session(#[from] hearth_session::Error),

    /// Request path refused by the resolver.
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server config cannot be served.
    #[error("Invalid server config: {0}")]
    InvalidConfig(String),

    /// Failed to bind the listener.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    /// Status code reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Path(_) | ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Session(_)
            | ServerError::InvalidConfig(_)
            | ServerError::Bind { .. }
            | ServerError::Io(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Clients only ever see the canned body for the status.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        response::respond_with(status)
    }
}
