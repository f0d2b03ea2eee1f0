//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    pub avatar_url: Option<String>,
}

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    req.validate()?;

    let input = chirp_core::user::CreateUserInput {
        username: req.username,
        email: req.email,
        password: req.password,
        avatar_url: req.avatar_url,
    };

    let user = state.user_service.create(input).await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Log in to an existing account.
///
/// Unknown username and wrong password produce the same negative result.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Log out (invalidate the current session token by rotating it).
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    state.user_service.regenerate_token(&user.id).await?;

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
