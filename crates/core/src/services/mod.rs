//! Business logic services.

#![allow(missing_docs)]

pub mod following;
pub mod like;
pub mod message;
pub mod user;

pub use following::FollowingService;
pub use like::{LikeResult, LikeService};
pub use message::{CreateMessageInput, MessageService};
pub use user::{
    ChangePasswordInput, CreateUserInput, UpdateProfileInput, UserService,
};
