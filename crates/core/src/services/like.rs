//! Like service.

use chirp_common::{AppError, AppResult, IdGenerator};
use chirp_db::{
    entities::{like, message},
    repositories::{LikeRepository, MessageRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeResult {
    /// The message is now liked.
    Liked,
    /// The like was removed.
    Unliked,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    message_repo: MessageRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub fn new(like_repo: LikeRepository, message_repo: MessageRepository) -> Self {
        Self {
            like_repo,
            message_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a message.
    ///
    /// Users may like any message, including their own.
    pub async fn like(&self, user_id: &str, message_id: &str) -> AppResult<like::Model> {
        // Message must exist
        self.message_repo.get_by_id(message_id).await?;

        // Check if already liked
        if self.like_repo.has_liked(user_id, message_id).await? {
            return Err(AppError::BadRequest(
                "Already liked this message".to_string(),
            ));
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            message_id: Set(message_id.to_string()),
            ..Default::default()
        };

        self.like_repo.create(model).await
    }

    /// Remove a like from a message.
    pub async fn unlike(&self, user_id: &str, message_id: &str) -> AppResult<()> {
        if !self.like_repo.has_liked(user_id, message_id).await? {
            return Err(AppError::BadRequest("Not liked".to_string()));
        }

        self.like_repo.delete_by_pair(user_id, message_id).await
    }

    /// Toggle a like: add it if absent, remove it otherwise.
    pub async fn toggle(&self, user_id: &str, message_id: &str) -> AppResult<LikeResult> {
        if self.like_repo.has_liked(user_id, message_id).await? {
            self.like_repo.delete_by_pair(user_id, message_id).await?;
            return Ok(LikeResult::Unliked);
        }

        // Message must exist
        self.message_repo.get_by_id(message_id).await?;

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            message_id: Set(message_id.to_string()),
            ..Default::default()
        };

        self.like_repo.create(model).await?;
        Ok(LikeResult::Liked)
    }

    /// Get the messages a user has liked, newest like first.
    pub async fn liked_messages(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        let likes = self.like_repo.find_by_user(user_id, limit, until_id).await?;

        let ids: Vec<String> = likes.into_iter().map(|l| l.message_id).collect();
        self.message_repo.find_by_ids(&ids).await
    }

    /// Count likes made by a user.
    pub async fn count_for_user(&self, user_id: &str) -> AppResult<u64> {
        self.like_repo.count_by_user(user_id).await
    }

    /// Count likes on a message.
    pub async fn count_for_message(&self, message_id: &str) -> AppResult<u64> {
        self.like_repo.count_by_message(message_id).await
    }
}
