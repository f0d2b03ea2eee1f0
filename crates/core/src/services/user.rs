//! User service.

use chirp_common::{AppError, AppResult, IdGenerator, hash_password, verify_password};
use chirp_db::{
    entities::{user, user_profile},
    repositories::{FollowingRepository, UserProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    following_repo: FollowingRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(max = 1024))]
    pub avatar_url: Option<String>,
}

/// Input for editing a profile. The current password must be re-entered.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 30))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    #[validate(length(max = 1024))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 1024))]
    pub header_url: Option<String>,

    /// Current password, required to confirm the edit.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Input for changing the account password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    /// Existing password.
    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(min = 6, max = 128))]
    pub new_password: String,

    #[validate(length(min = 6, max = 128))]
    pub confirm_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        following_repo: FollowingRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            following_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Sign up a new user.
    ///
    /// Validates the input, checks username/email availability, hashes the
    /// password and persists the user with a fresh session token.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        // Check if username is taken
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        // Check if email is taken
        if self
            .profile_repo
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Email already taken".to_string()));
        }

        // Hash password
        let password_hash = hash_password(&input.password)?;

        // Generate token and user ID
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        // Create user
        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            token: Set(Some(token)),
            avatar_url: Set(input.avatar_url),
            ..Default::default()
        };

        let user = self.user_repo.create(user_model).await?;

        // Create the credentials row
        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id),
            email: Set(input.email.to_lowercase()),
            password: Set(password_hash),
        };

        self.profile_repo.create(profile_model).await?;

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    /// List users, optionally filtered by a username substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(search, limit, offset).await
    }

    /// Authenticate a user by session token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Authenticate a user by username and password.
    ///
    /// An unknown username and a wrong password yield the same
    /// [`AppError::Unauthorized`] result.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &profile.password)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Regenerate a user's session token, invalidating the current one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Edit a user's profile. The current password must verify first.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let profile = self.profile_repo.get_by_user_id(user_id).await?;

        if !verify_password(&input.password, &profile.password)? {
            return Err(AppError::Unauthorized);
        }

        // Username change must stay unique
        if let Some(ref username) = input.username
            && username.to_lowercase() != user.username_lower
            && self.user_repo.find_by_username(username).await?.is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        // Email change must stay unique
        if let Some(ref email) = input.email
            && email.to_lowercase() != profile.email
            && self.profile_repo.find_by_email(email).await?.is_some()
        {
            return Err(AppError::BadRequest("Email already taken".to_string()));
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(username) = input.username {
            active.username_lower = Set(username.to_lowercase());
            active.username = Set(username);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(header_url) = input.header_url {
            active.header_url = Set(Some(header_url));
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;

        if let Some(email) = input.email {
            let mut active: user_profile::ActiveModel = profile.into();
            active.email = Set(email.to_lowercase());
            self.profile_repo.update(active).await?;
        }

        Ok(updated)
    }

    /// Change a user's password after verifying the existing one.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        if input.new_password != input.confirm_password {
            return Err(AppError::BadRequest("Passwords do not match".to_string()));
        }

        let profile = self.profile_repo.get_by_user_id(user_id).await?;

        if !verify_password(&input.password, &profile.password)? {
            return Err(AppError::Unauthorized);
        }

        let password_hash = hash_password(&input.new_password)?;

        let mut active: user_profile::ActiveModel = profile.into();
        active.password = Set(password_hash);
        self.profile_repo.update(active).await?;

        Ok(())
    }

    /// Delete a user's own account.
    ///
    /// Messages, follow edges and likes are removed by cascade; the
    /// denormalized counts on counterpart users are adjusted first.
    pub async fn delete_account(&self, user_id: &str) -> AppResult<()> {
        let followee_ids = self.following_repo.find_following_ids(user_id).await?;
        let follower_ids = self.following_repo.find_follower_ids(user_id).await?;

        for followee_id in &followee_ids {
            self.user_repo.decrement_followers_count(followee_id).await?;
        }
        for follower_id in &follower_ids {
            self.user_repo.decrement_following_count(follower_id).await?;
        }

        self.user_repo.delete(user_id).await?;

        tracing::info!(user_id = %user_id, "Deleted account");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chirp_common::hash_password;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            token: Some("test_token".to_string()),
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

    fn create_test_profile(user_id: &str, password: &str) -> user_profile::Model {
        user_profile::Model {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            password: hash_password(password).unwrap(),
        }
    }

    fn create_test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        profile_db: Arc<sea_orm::DatabaseConnection>,
        following_db: Arc<sea_orm::DatabaseConnection>,
    ) -> UserService {
        let user_repo = UserRepository::new(user_db);
        let profile_repo = UserProfileRepository::new(profile_db);
        let following_repo = FollowingRepository::new(following_db);
        UserService::new(user_repo, profile_repo, following_repo)
    }

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_create_user_input_validation() {
        // Username too long
        let input = CreateUserInput {
            username: "a".repeat(200),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(input.validate().is_err());

        // Empty username
        let input = CreateUserInput {
            username: String::new(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(input.validate().is_err());

        // Malformed email
        let input = CreateUserInput {
            username: "testuser".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(input.validate().is_err());

        // Password too short (and the empty password special case)
        for password in ["short", ""] {
            let input = CreateUserInput {
                username: "testuser".to_string(),
                email: "user@example.com".to_string(),
                password: password.to_string(),
                avatar_url: None,
            };
            assert!(input.validate().is_err());
        }

        // Valid input
        let input = CreateUserInput {
            username: "testuser".to_string(),
            email: "user@example.com".to_string(),
            password: "123456".to_string(),
            avatar_url: None,
        };
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_create_user() {
        let created = create_test_user("user3", "user3");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Username availability check finds nothing
                .append_query_results([Vec::<user::Model>::new()])
                // INSERT .. RETURNING
                .append_query_results([[created.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Email availability check finds nothing
                .append_query_results([Vec::<user_profile::Model>::new()])
                .append_query_results([[create_test_profile("user3", "pass123")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = create_test_service(user_db, profile_db, empty_mock());

        let input = CreateUserInput {
            username: "user3".to_string(),
            email: "user3@user3.com".to_string(),
            password: "pass123".to_string(),
            avatar_url: None,
        };

        let user = service.create(input).await.unwrap();
        assert_eq!(user.username, "user3");
        // A fresh user has no messages and no followers
        assert_eq!(user.messages_count, 0);
        assert_eq!(user.followers_count, 0);
    }

    #[tokio::test]
    async fn test_create_user_username_taken() {
        let existing = create_test_user("user1", "user1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_mock(), empty_mock());

        let input = CreateUserInput {
            username: "user1".to_string(),
            email: "user1@user1.com".to_string(),
            password: "123456".to_string(),
            avatar_url: None,
        };

        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let user = create_test_user("user1", "user1");
        let profile = create_test_profile("user1", "123456");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let service = create_test_service(user_db, profile_db, empty_mock());

        let result = service.authenticate("user1", "123456").await.unwrap();
        assert_eq!(result.id, "user1");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user("user1", "user1");
        let profile = create_test_profile("user1", "123456");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let service = create_test_service(user_db, profile_db, empty_mock());

        let result = service.authenticate("user1", "1234567").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_mock(), empty_mock());

        // Same negative result as a wrong password
        let result = service.authenticate("notauser", "123456").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let user = create_test_user("user1", "testuser");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_mock(), empty_mock());

        let result = service.authenticate_by_token("test_token").await.unwrap();
        assert_eq!(result.id, "user1");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_mock(), empty_mock());

        let result = service.authenticate_by_token("invalid").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_mock(), empty_mock());

        let result = service.get("nonexistent").await;
        assert!(result.is_err());
        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_update_profile_wrong_password() {
        let user = create_test_user("user1", "user1");
        let profile = create_test_profile("user1", "123456");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let service = create_test_service(user_db, profile_db, empty_mock());

        let input = UpdateProfileInput {
            username: None,
            email: None,
            bio: Some("new bio".to_string()),
            location: None,
            avatar_url: None,
            header_url: None,
            password: "wrong_pass".to_string(),
        };

        let result = service.update_profile("user1", input).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_change_password_mismatch() {
        let service = create_test_service(empty_mock(), empty_mock(), empty_mock());

        let input = ChangePasswordInput {
            password: "123456".to_string(),
            new_password: "abcdef".to_string(),
            confirm_password: "abcdeg".to_string(),
        };

        let result = service.change_password("user1", input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
