//! Like endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use chirp_core::LikeResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub message_id: String,
}

/// Like a message.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<ApiResponse<()>> {
    state.like_service.like(&user.id, &req.message_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Remove a like from a message.
async fn unlike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<ApiResponse<()>> {
    state.like_service.unlike(&user.id, &req.message_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub status: LikeResult,
}

/// Toggle a like: add it if absent, remove it otherwise.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<ApiResponse<ToggleResponse>> {
    let status = state.like_service.toggle(&user.id, &req.message_id).await?;
    Ok(ApiResponse::ok(ToggleResponse { status }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(like))
        .route("/delete", post(unlike))
        .route("/toggle", post(toggle))
}
