//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use super::map_insert_err;

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and message.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        message_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::MessageId.eq(message_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a message.
    pub async fn has_liked(&self, user_id: &str, message_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, message_id).await?.is_some())
    }

    /// Create a new like.
    ///
    /// A racing duplicate like surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_err)
    }

    /// Delete a like by pair.
    pub async fn delete_by_pair(&self, user_id: &str, message_id: &str) -> AppResult<()> {
        let like = self.find_by_pair(user_id, message_id).await?;
        if let Some(l) = like {
            l.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get a user's likes, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<like::Model>> {
        let mut query = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .order_by_desc(like::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(like::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes made by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a message.
    pub async fn count_by_message(&self, message_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::MessageId.eq(message_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
