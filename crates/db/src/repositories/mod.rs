//! Repositories for database access.

pub mod following;
pub mod like;
pub mod message;
pub mod user;
pub mod user_profile;

pub use following::FollowingRepository;
pub use like::LikeRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;

use chirp_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a database error from an insert, surfacing unique-constraint
/// violations as [`AppError::Conflict`] so handlers can report them.
pub(crate) fn map_insert_err(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::Conflict(msg),
        _ => AppError::Database(e.to_string()),
    }
}
