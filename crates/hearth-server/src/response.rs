//! Plain-text responses with fixed default bodies.

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Default body for `status`, or `None` if the status has no canned body.
pub fn default_body(status: StatusCode) -> Option<&'static str> {
    let body = match status {
        StatusCode::OK => "OK\n",
        StatusCode::NOT_FOUND => "Not Found\n",
        StatusCode::UNAUTHORIZED => "Unauthorized\n",
        StatusCode::NOT_ACCEPTABLE => "Not Acceptable\n",
        StatusCode::LENGTH_REQUIRED => "Length Required\n",
        StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed\n",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error\n",
        StatusCode::EXPECTATION_FAILED => "Expectation Failed\n",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported Media Type\n",
        _ => return None,
    };
    Some(body)
}

/// Respond with `body` and `status`.
pub fn respond(body: impl Into<Body>, status: StatusCode) -> Response {
    (status, body.into()).into_response()
}

/// Respond with `status` and its default body.
///
/// Statuses without a canned body get an empty one.
pub fn respond_with(status: StatusCode) -> Response {
    respond(default_body(status).unwrap_or_default(), status)
}

pub fn ok() -> Response {
    respond_with(StatusCode::OK)
}

/// 200 with a caller-supplied body.
pub fn ok_with_body(body: impl Into<Body>) -> Response {
    respond(body, StatusCode::OK)
}

pub fn not_found() -> Response {
    respond_with(StatusCode::NOT_FOUND)
}

pub fn unauthorized() -> Response {
    respond_with(StatusCode::UNAUTHORIZED)
}

pub fn not_acceptable() -> Response {
    respond_with(StatusCode::NOT_ACCEPTABLE)
}

pub fn length_required() -> Response {
    respond_with(StatusCode::LENGTH_REQUIRED)
}

pub fn method_not_allowed() -> Response {
    respond_with(StatusCode::METHOD_NOT_ALLOWED)
}

pub fn internal_server_error() -> Response {
    respond_with(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn expectation_failed() -> Response {
    respond_with(StatusCode::EXPECTATION_FAILED)
}

pub fn unsupported_media_type() -> Response {
    respond_with(StatusCode::UNSUPPORTED_MEDIA_TYPE)
}

/// 307 Temporary Redirect to `location` with an empty body.
pub fn redirect(location: &str) -> Response {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
        Body::empty(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_named_helpers_use_default_bodies() {
        let cases = [
            (ok(), StatusCode::OK, "OK\n"),
            (not_found(), StatusCode::NOT_FOUND, "Not Found\n"),
            (unauthorized(), StatusCode::UNAUTHORIZED, "Unauthorized\n"),
            (not_acceptable(), StatusCode::NOT_ACCEPTABLE, "Not Acceptable\n"),
            (length_required(), StatusCode::LENGTH_REQUIRED, "Length Required\n"),
            (
                method_not_allowed(),
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed\n",
            ),
            (
                internal_server_error(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error\n",
            ),
            (
                expectation_failed(),
                StatusCode::EXPECTATION_FAILED,
                "Expectation Failed\n",
            ),
            (
                unsupported_media_type(),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Media Type\n",
            ),
        ];

        for (response, status, body) in cases {
            assert_eq!(response.status(), status);
            assert_eq!(body_text(response).await, body);
        }
    }

    #[tokio::test]
    async fn test_respond_with_unlisted_status_is_empty() {
        let response = respond_with(StatusCode::IM_A_TEAPOT);
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_custom_body() {
        let response = ok_with_body("hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "hello");
    }

    #[tokio::test]
    async fn test_redirect() {
        let response = redirect("/login");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert_eq!(body_text(response).await, "");
    }
}
