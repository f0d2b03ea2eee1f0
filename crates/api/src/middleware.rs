//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use chirp_core::{FollowingService, LikeService, MessageService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub message_service: MessageService,
    pub following_service: FollowingService,
    pub like_service: LikeService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions; handlers pick it up through the `AuthUser` /
/// `MaybeAuthUser` extractors. Requests without a valid token simply carry
/// no identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Resolve the session token to a user; requests with an invalid
        // token simply proceed anonymously.
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
