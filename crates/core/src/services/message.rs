//! Message service.

use chirp_common::{AppError, AppResult, IdGenerator};
use chirp_db::{
    entities::message,
    repositories::{FollowingRepository, MessageRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Most messages a single timeline page returns.
const TIMELINE_LIMIT: u64 = 100;

/// Message service for business logic.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    user_repo: UserRepository,
    following_repo: FollowingRepository,
    id_gen: IdGenerator,
}

/// Input for composing a new message.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageInput {
    #[validate(length(min = 1, max = 140))]
    pub text: String,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub fn new(
        message_repo: MessageRepository,
        user_repo: UserRepository,
        following_repo: FollowingRepository,
    ) -> Self {
        Self {
            message_repo,
            user_repo,
            following_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Compose a new message owned by `user_id`.
    pub async fn create(&self, user_id: &str, input: CreateMessageInput) -> AppResult<message::Model> {
        input.validate()?;

        // Owner must exist
        self.user_repo.get_by_id(user_id).await?;

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            text: Set(input.text),
            ..Default::default()
        };

        let message = self.message_repo.create(model).await?;

        self.user_repo.increment_messages_count(user_id).await?;

        Ok(message)
    }

    /// Get a message by ID. Public, no authentication required.
    pub async fn get(&self, id: &str) -> AppResult<message::Model> {
        self.message_repo.get_by_id(id).await
    }

    /// Delete a message. Only the owner may delete; anyone else gets the
    /// same unauthorized response and the message remains.
    pub async fn delete(&self, message_id: &str, user_id: &str) -> AppResult<()> {
        let message = self.message_repo.get_by_id(message_id).await?;

        if message.user_id != user_id {
            return Err(AppError::Unauthorized);
        }

        self.message_repo.delete(message_id).await?;
        self.user_repo.decrement_messages_count(user_id).await?;

        tracing::debug!(message_id = %message_id, "Deleted message");
        Ok(())
    }

    /// Get a user's messages, newest first.
    pub async fn user_messages(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        self.message_repo
            .find_by_user(user_id, limit.min(TIMELINE_LIMIT), until_id)
            .await
    }

    /// Get the home timeline for a user: their own messages plus those of
    /// everyone they follow, newest first.
    pub async fn home_timeline(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        let following_ids = self.following_repo.find_following_ids(user_id).await?;

        self.message_repo
            .find_home_timeline(user_id, &following_ids, limit.min(TIMELINE_LIMIT), until_id)
            .await
    }
}
