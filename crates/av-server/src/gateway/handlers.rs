use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use av_core::types::{AppId, AppRecord};

use super::cookie;
use super::error::ApiError;
use crate::process::StatusSnapshot;
use crate::state::ServerState;

#[derive(Serialize)]
pub(super) struct InfoResponse {
    status: &'static str,
    backend: &'static str,
    version: &'static str,
    hostname: String,
    auth_required: bool,
    is_authorized: bool,
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    pin: String,
}

#[derive(Serialize)]
pub(super) struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub(super) struct LaunchResponse {
    status: &'static str,
    message: String,
    pid: u32,
}

pub(super) async fn ping() -> &'static str {
    "PONG"
}

/// Server metadata; reports whether the caller's cookie is valid without
/// requiring it to be
pub(super) async fn info(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Json<InfoResponse> {
    let token = cookie::session_token(&headers);
    Json(InfoResponse {
        status: "running",
        backend: "rust",
        version: env!("CARGO_PKG_VERSION"),
        hostname: host_label(),
        auth_required: state.sessions.is_required(),
        is_authorized: state.sessions.is_valid(token.as_deref()),
    })
}

fn host_label() -> String {
    format!(
        "{}@{}",
        whoami::username(),
        gethostname::gethostname().to_string_lossy()
    )
}

pub(super) async fn login(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let token = state.sessions.login(&request.pin)?;
    let set_cookie = cookie::issue(&token, state.sessions.lifetime());
    Ok(([(SET_COOKIE, set_cookie)], Json(StatusResponse { status: "success" })))
}

pub(super) async fn logout(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = cookie::session_token(&headers) {
        state.sessions.logout(&token);
    }
    ([(SET_COOKIE, cookie::clear())], Json(StatusResponse { status: "success" }))
}

pub(super) async fn list_apps(State(state): State<Arc<ServerState>>) -> Json<Vec<AppRecord>> {
    Json(state.registry.list())
}

pub(super) async fn launch_app(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let id = AppId::new(id);
    let app = state.registry.get(&id).ok_or(ApiError::AppNotFound)?;

    let pid = state.tracker.launch(&id).map_err(|e| {
        tracing::error!("Failed to launch {}: {}", app.name, e);
        ApiError::from(e)
    })?;

    Ok(Json(LaunchResponse {
        status: "success",
        message: format!("Launched {}", app.name),
        pid,
    }))
}

pub(super) async fn process_statuses(
    State(state): State<Arc<ServerState>>,
) -> Json<StatusSnapshot> {
    Json(state.status_cache.get_cached_statuses().await)
}

pub(super) async fn not_found() -> ApiError {
    ApiError::NotFound
}
