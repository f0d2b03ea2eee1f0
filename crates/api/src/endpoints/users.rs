//! Users endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::{AppError, AppResult};
use chirp_core::{ChangePasswordInput, UpdateProfileInput};
use chirp_db::entities::user;
use serde::{Deserialize, Serialize};

use super::messages::MessageResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub created_at: String,
    pub username: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub header_url: Option<String>,
    pub followers_count: i32,
    pub following_count: i32,
    pub messages_count: i32,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at.to_rfc3339(),
            username: user.username,
            bio: user.bio,
            location: user.location,
            avatar_url: user.avatar_url,
            header_url: user.header_url,
            followers_count: user.followers_count,
            following_count: user.following_count,
            messages_count: user.messages_count,
        }
    }
}

/// Profile response: the user plus their like count.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub likes_count: u64,
}

/// Get current user.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Show user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

/// Get a user's profile by ID or username, with message, following,
/// follower and like counts.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = if let Some(user_id) = req.user_id {
        state.user_service.get(&user_id).await?
    } else if let Some(username) = req.username {
        state.user_service.get_by_username(&username).await?
    } else {
        return Err(AppError::BadRequest(
            "Either userId or username is required".to_string(),
        ));
    };

    let likes_count = state.like_service.count_for_user(&user.id).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        user: user.into(),
        likes_count,
    }))
}

/// List users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    /// Optional username substring filter.
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// List users, optionally filtered by a username substring.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListUsersRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = req.limit.min(100);
    let users = state
        .user_service
        .list(req.query.as_deref(), limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Update profile request. The current password must be re-entered.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub header_url: Option<String>,
    pub password: String,
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            bio: req.bio,
            location: req.location,
            avatar_url: req.avatar_url,
            header_url: req.header_url,
            password: req.password,
        }
    }
}

/// Edit the current user's profile.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .update_profile(&user.id, req.into())
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Change password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Change the current user's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    let input = ChangePasswordInput {
        password: req.password,
        new_password: req.new_password,
        confirm_password: req.confirm_password,
    };

    state.user_service.change_password(&user.id, input).await?;

    Ok(ApiResponse::ok(()))
}

/// Delete the current user's account.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete_account(&user.id).await?;
    Ok(ApiResponse::ok(()))
}

/// List followers/following request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEdgeRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// Get the users a user is following. Requires authentication.
async fn following(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListEdgeRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = req.limit.min(100);
    let users = state
        .following_service
        .get_following(&req.user_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Get the users following a user. Requires authentication.
async fn followers(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListEdgeRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = req.limit.min(100);
    let users = state
        .following_service
        .get_followers(&req.user_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Liked messages request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedMessagesRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Get the messages a user has liked.
async fn likes(
    State(state): State<AppState>,
    Json(req): Json<LikedMessagesRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let limit = req.limit.min(100);
    let messages = state
        .like_service
        .liked_messages(&req.user_id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", post(me))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/update", post(update))
        .route("/change-password", post(change_password))
        .route("/delete", post(delete))
        .route("/following", post(following))
        .route("/followers", post(followers))
        .route("/likes", post(likes))
}
