//! Session middleware and extractor.
//!
//! [`session_middleware`] binds every request to a session before the handler
//! runs. Handlers pick it up with the [`CurrentSession`] extractor:
//!
//! ```ignore
//! use hearth_server::CurrentSession;
//!
//! async fn handler(CurrentSession(session): CurrentSession) -> String {
//!     session.read().get("user").unwrap_or("anonymous").to_string()
//! }
//! ```

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hearth_session::{RequestCookies, SharedSession};
use tracing::error;

use crate::error::ServerError;
use crate::response;
use crate::state::AppState;

/// The session bound to the current request.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SharedSession);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| {
                error!("CurrentSession requested on a route without session middleware");
                response::internal_server_error()
            })
    }
}

/// Parse the request's `Cookie` headers.
pub fn request_cookies(request: &Request<Body>) -> RequestCookies {
    RequestCookies::parse(
        request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

/// Session middleware function.
///
/// Resolves the session for the request, stores it in the request extensions,
/// and appends `Set-Cookie` to the response when the client needs a new
/// cookie. Manager failures are answered with 500.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let cookies = request_cookies(&request);
    let lookup = state.sessions.get_or_create_session(&cookies).await?;

    let set_cookie = lookup
        .set_cookie
        .map(|cookie| HeaderValue::try_from(cookie.to_header_value()))
        .transpose()
        .map_err(|e| ServerError::Internal(format!("Unencodable session cookie: {e}")))?;

    request
        .extensions_mut()
        .insert(CurrentSession(lookup.session));

    let mut response = next.run(request).await.into_response();
    if let Some(value) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(response)
}
