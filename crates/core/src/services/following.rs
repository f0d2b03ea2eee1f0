//! Following service.

use chirp_common::{AppError, AppResult, IdGenerator};
use chirp_db::{
    entities::{following, user},
    repositories::{FollowingRepository, UserRepository},
};
use sea_orm::Set;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub fn new(following_repo: FollowingRepository, user_repo: UserRepository) -> Self {
        Self {
            following_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<following::Model> {
        // Can't follow yourself
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        // Check if already following
        if self
            .following_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::BadRequest("Already following".to_string()));
        }

        // Both users must exist
        let follower = self.user_repo.get_by_id(follower_id).await?;
        let followee = self.user_repo.get_by_id(followee_id).await?;

        let model = following::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id.clone()),
            followee_id: Set(followee.id.clone()),
            ..Default::default()
        };

        let following = self.following_repo.create(model).await?;

        // Update counts
        self.user_repo.increment_following_count(&follower.id).await?;
        self.user_repo.increment_followers_count(&followee.id).await?;

        Ok(following)
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        // Check if following
        if !self
            .following_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::BadRequest("Not following".to_string()));
        }

        self.following_repo
            .delete_by_pair(follower_id, followee_id)
            .await?;

        // Update counts
        self.user_repo.decrement_following_count(follower_id).await?;
        self.user_repo.decrement_followers_count(followee_id).await?;

        Ok(())
    }

    /// Check if `follower_id` is following `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.following_repo
            .is_following(follower_id, followee_id)
            .await
    }

    /// Check if `user_id` is followed by `follower_id`.
    pub async fn is_followed_by(&self, user_id: &str, follower_id: &str) -> AppResult<bool> {
        self.following_repo
            .is_followed_by(user_id, follower_id)
            .await
    }

    /// Get the users that a user is following (paginated).
    pub async fn get_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        let edges = self
            .following_repo
            .find_following(user_id, limit, until_id)
            .await?;

        let ids: Vec<String> = edges.into_iter().map(|f| f.followee_id).collect();
        self.user_repo.find_by_ids(&ids).await
    }

    /// Get the users that are following a user (paginated).
    pub async fn get_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user::Model>> {
        let edges = self
            .following_repo
            .find_followers(user_id, limit, until_id)
            .await?;

        let ids: Vec<String> = edges.into_iter().map(|f| f.follower_id).collect();
        self.user_repo.find_by_ids(&ids).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            token: None,
            bio: None,
            location: None,
            avatar_url: None,
            header_url: None,
            followers_count: 0,
            following_count: 0,
            messages_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_following(id: &str, follower_id: &str, followee_id: &str) -> following::Model {
        following::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_service(
        following_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> FollowingService {
        FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        )
    }

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_follow_yourself_rejected() {
        let service = create_test_service(empty_mock(), empty_mock());

        let result = service.follow("user1", "user1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_follow_already_following_rejected() {
        let edge = create_test_following("f1", "user1", "user2");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let service = create_test_service(following_db, empty_mock());

        let result = service.follow("user1", "user2").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_follow_success() {
        let edge = create_test_following("f1", "user1", "user2");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Not yet following
                .append_query_results([Vec::<following::Model>::new()])
                // INSERT .. RETURNING
                .append_query_results([[edge]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_user("user1", "user1")],
                    vec![create_test_user("user2", "user2")],
                ])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = create_test_service(following_db, user_db);

        let result = service.follow("user1", "user2").await.unwrap();
        assert_eq!(result.follower_id, "user1");
        assert_eq!(result.followee_id, "user2");
    }

    #[tokio::test]
    async fn test_unfollow_not_following_rejected() {
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<following::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(following_db, empty_mock());

        let result = service.unfollow("user1", "user2").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_is_following_directions() {
        // Stored edge: user1 -> user2. Three lookups hit the same pair
        // query; only the first direction matches.
        let edge = create_test_following("f1", "user1", "user2");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![edge.clone()]])
                .append_query_results([vec![edge]])
                .append_query_results([Vec::<following::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(following_db, empty_mock());

        assert!(service.is_following("user1", "user2").await.unwrap());
        assert!(service.is_followed_by("user2", "user1").await.unwrap());
        assert!(!service.is_following("user2", "user1").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_following_resolves_users() {
        let f1 = create_test_following("f1", "user1", "user2");
        let f2 = create_test_following("f2", "user1", "user3");

        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_user("user2", "user2"),
                    create_test_user("user3", "user3"),
                ]])
                .into_connection(),
        );

        let service = create_test_service(following_db, user_db);

        let result = service.get_following("user1", 10, None).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].username, "user2");
    }
}
