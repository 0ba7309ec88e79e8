//! Request logging middleware.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Log one line per request: method, target, peer, status and duration.
///
/// 5xx responses are logged at error level, 4xx at warn, everything else at
/// info. The peer is `-` when the server was not started with connect info.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            target = %target,
            remote = %remote,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            target = %target,
            remote = %remote,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            method = %method,
            target = %target,
            remote = %remote,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::response;
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use hearth_session::{SessionConfig, SessionManager};
    use tower::ServiceExt;

    fn app(request_logging: bool) -> Router {
        let state = AppState::new(
            ServerConfig::new().with_request_logging(request_logging),
            SessionManager::new(SessionConfig::default()),
        );
        Router::new()
            .route("/ok", get(|| async { response::ok() }))
            .route("/boom", get(|| async { response::internal_server_error() }))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                request_logging_middleware,
            ))
            .with_state(state)
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(
            axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_logging_passes_responses_through() {
        assert_eq!(status_of(app(true), "/ok?x=1").await, StatusCode::OK);
        assert_eq!(
            status_of(app(true), "/boom").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(app(true), "/missing").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_disabled_logging_is_transparent() {
        assert_eq!(status_of(app(false), "/ok").await, StatusCode::OK);
    }
}
