//! Request middleware: preflight, API response headers, session check

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, EXPIRES, PRAGMA,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::cookie;
use super::error::ApiError;
use crate::state::ServerState;

fn insert_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
}

/// Answer every OPTIONS request with 200 and CORS headers, before routing
pub(super) async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        insert_cors(response.headers_mut());
        return response;
    }
    next.run(request).await
}

/// CORS and cache suppression on every API response
///
/// Mobile browsers cache aggressively, so statuses would go stale without
/// these.
pub(super) async fn api_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    insert_cors(headers);
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    response
}

/// Reject requests without a valid session cookie
pub(super) async fn require_session(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let token = cookie::session_token(request.headers());
    if !state.sessions.authorize(token.as_deref()) {
        tracing::debug!("Unauthorized request to {}", request.uri().path());
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}
