//! Messages endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use chirp_core::CreateMessageInput;
use chirp_db::entities::message;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Message response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub text: String,
}

impl From<message::Model> for MessageResponse {
    fn from(message: message::Model) -> Self {
        Self {
            id: message.id,
            created_at: message.created_at.to_rfc3339(),
            user_id: message.user_id,
            text: message.text,
        }
    }
}

/// Create message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub text: String,
}

/// Compose a new message.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let input = CreateMessageInput { text: req.text };

    let message = state.message_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Show message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowMessageRequest {
    pub message_id: String,
}

/// Get a single message. Public, no authentication required.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let message = state.message_service.get(&req.message_id).await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Delete message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: String,
}

/// Delete a message. Only the owner may delete it.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteMessageRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .message_service
        .delete(&req.message_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Per-user feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessagesRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Timeline request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    100
}

/// Get a user's messages, newest first.
async fn by_user(
    State(state): State<AppState>,
    Json(req): Json<UserMessagesRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .user_messages(&req.user_id, req.limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

/// Get the home timeline: the authenticated user's messages plus those of
/// everyone they follow.
async fn timeline(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<TimelineRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .home_timeline(&user.id, req.limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/delete", post(delete))
        .route("/by-user", post(by_user))
        .route("/timeline", post(timeline))
}
