//! API endpoints.

mod auth;
mod following;
mod likes;
mod messages;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use messages::MessageResponse;
pub use users::UserResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/following", following::router())
        .nest("/messages", messages::router())
        .nest("/messages/likes", likes::router())
}
