//! Message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a message by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MessageNotFound(id.to_string()))
    }

    /// Find messages by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<message::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Message::find()
            .filter(message::Column::Id.is_in(ids.to_vec()))
            .order_by_desc(message::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a message.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let message = self.get_by_id(id).await?;
        message
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's messages, newest first (paginated by ID cursor).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        let mut query = Message::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(message::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the home timeline: messages from the user and everyone they follow,
    /// newest first (paginated by ID cursor).
    pub async fn find_home_timeline(
        &self,
        user_id: &str,
        following_ids: &[String],
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        // Include own messages and messages from followed users
        let mut user_ids = following_ids.to_vec();
        user_ids.push(user_id.to_string());

        let mut condition = Condition::all().add(message::Column::UserId.is_in(user_ids));

        if let Some(until) = until_id {
            condition = condition.add(message::Column::Id.lt(until));
        }

        Message::find()
            .filter(condition)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count messages owned by a user.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Message::find()
            .filter(message::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
