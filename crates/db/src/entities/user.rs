//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Current session token; NULL = no active session
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Short self-description shown on the profile page
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Free-form location string
    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Profile image URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Profile header image URL
    #[sea_orm(nullable)]
    pub header_url: Option<String>,

    /// Followers count (denormalized)
    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    /// Following count (denormalized)
    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    /// Messages count (denormalized)
    #[sea_orm(default_value = 0)]
    pub messages_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,

    #[sea_orm(has_one = "super::user_profile::Entity")]
    Profile,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
