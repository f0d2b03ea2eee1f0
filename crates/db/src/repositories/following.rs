//! Following repository.

use std::sync::Arc;

use crate::entities::{Following, following};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use super::map_insert_err;

/// Following repository for database operations.
#[derive(Clone)]
pub struct FollowingRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowingRepository {
    /// Create a new following repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a following relationship by follower and followee.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Option<following::Model>> {
        Following::find()
            .filter(following::Column::FollowerId.eq(follower_id))
            .filter(following::Column::FolloweeId.eq(followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followee_id).await?.is_some())
    }

    /// Check if a user is followed by another user (the inverse direction).
    pub async fn is_followed_by(&self, user_id: &str, follower_id: &str) -> AppResult<bool> {
        self.is_following(follower_id, user_id).await
    }

    /// Create a new following relationship.
    ///
    /// A racing duplicate edge surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: following::ActiveModel) -> AppResult<following::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_err)
    }

    /// Delete a following relationship by pair.
    pub async fn delete_by_pair(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        let following = self.find_by_pair(follower_id, followee_id).await?;
        if let Some(f) = following {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get the edges for users that a user is following (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        let mut query = Following::find()
            .filter(following::Column::FollowerId.eq(user_id))
            .order_by_desc(following::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(following::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the edges for users that are following a user (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        let mut query = Following::find()
            .filter(following::Column::FolloweeId.eq(user_id))
            .order_by_desc(following::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(following::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the IDs of every user a user is following (for timeline queries).
    pub async fn find_following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Following::find()
            .filter(following::Column::FollowerId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.into_iter().map(|f| f.followee_id).collect())
    }

    /// Get the IDs of every user following a user.
    pub async fn find_follower_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Following::find()
            .filter(following::Column::FolloweeId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.into_iter().map(|f| f.follower_id).collect())
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Following::find()
            .filter(following::Column::FolloweeId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count following of a user.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Following::find()
            .filter(following::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
