//! Following endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Follow request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

/// Follow response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub id: String,
    pub created_at: String,
    pub follower_id: String,
    pub followee_id: String,
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let edge = state
        .following_service
        .follow(&user.id, &req.user_id)
        .await?;

    Ok(ApiResponse::ok(FollowResponse {
        id: edge.id,
        created_at: edge.created_at.to_rfc3339(),
        follower_id: edge.follower_id,
        followee_id: edge.followee_id,
    }))
}

/// Stop following a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .following_service
        .unfollow(&user.id, &req.user_id)
        .await?;

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(follow))
        .route("/delete", post(unfollow))
}
