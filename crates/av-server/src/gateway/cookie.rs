//! Session cookie parsing and construction

use std::time::Duration;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "aviator_session";

/// Session token from the request's `Cookie` headers, if present
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim_matches('"').to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value issuing `token` for `lifetime`
pub fn issue(token: &str, lifetime: Duration) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        token,
        lifetime.as_secs()
    )
}

/// `Set-Cookie` value that expires the session cookie immediately
pub fn clear() -> String {
    format!("{}=; Path=/; Max-Age=-1; HttpOnly; SameSite=Lax", SESSION_COOKIE)
}
