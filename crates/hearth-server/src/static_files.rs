//! Static file handler.

use std::path::Path;

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{error, warn};

use crate::error::{Result, ServerError};
use crate::safe_path;
use crate::state::AppState;

/// Content type for a file, chosen by extension.
pub fn content_type(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "html" => Some("text/html"),
        "js" => Some("text/javascript"),
        "css" => Some("text/css"),
        _ => None,
    }
}

/// Serve a file from the configured static directory.
///
/// The request path must start with the configured webroot and pass
/// [`safe_path::resolve`]. Anything refused or unreadable is a plain 404.
pub async fn static_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let config = state.config();
    let Some(ref static_dir) = config.static_dir else {
        return Err(ServerError::NotFound(uri.path().to_string()));
    };

    let relative = safe_path::resolve(&config.webroot, uri.path()).inspect_err(|e| {
        error!(path = %uri.path(), error = %e, "Refused static file request");
    })?;

    let path = static_dir.join(&relative);
    let not_found = || ServerError::NotFound(path.display().to_string());

    let file = File::open(&path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Error attempting to open file");
        not_found()
    })?;

    // Directories open fine on unix but cannot be streamed.
    let meta = file.metadata().await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Error reading file metadata");
        not_found()
    })?;
    if !meta.is_file() {
        warn!(path = %path.display(), "Requested path is not a file");
        return Err(not_found());
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(match content_type(&path) {
        Some(content_type) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        None => (StatusCode::OK, body).into_response(),
    })
}
