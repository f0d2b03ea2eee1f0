//! User profile repository.

use std::sync::Arc;

use crate::entities::{UserProfile, user_profile};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::map_insert_err;

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by user ID, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new profile.
    ///
    /// A racing duplicate email surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_err)
    }

    /// Update a profile.
    pub async fn update(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
