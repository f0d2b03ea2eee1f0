//! Database entities.

pub mod following;
pub mod like;
pub mod message;
pub mod user;
pub mod user_profile;

pub use following::Entity as Following;
pub use like::Entity as Like;
pub use message::Entity as Message;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
