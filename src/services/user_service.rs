use std::sync::Arc;

use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    auth::{hash_password, sha256_hex, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{RefreshToken, User},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::AuthResponse,
        },
    },
    repositories::{RefreshTokenRepository, UserRepository},
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    jwt_service: Arc<JwtService>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            repository,
            refresh_tokens,
            jwt_service,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                request.username
            )));
        }

        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                request.email
            )));
        }

        let user = User::new(
            &request.first_name,
            &request.last_name,
            &request.username,
            &request.email,
            &hash_password(&request.password),
        );
        let user = self.repository.create(user).await?;

        log::info!("Registered administrator '{}'", user.username);
        self.issue_tokens(&user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        // One message for both failure modes so usernames can't be probed
        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(invalid());
        }

        self.issue_tokens(&user).await
    }

    /// Rotate a refresh token: the presented token must verify, be known to
    /// the server, and not be revoked or expired. The old record is revoked
    /// before new tokens are issued.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.validate_refresh_token(refresh_token)?;

        let token_hash = sha256_hex(refresh_token);
        let record = self
            .refresh_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Refresh token is not recognized".to_string()))?;

        if !record.is_active() {
            return Err(AppError::Unauthorized(
                "Refresh token has been revoked".to_string(),
            ));
        }

        let user = self
            .repository
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("User associated with refresh token not found".to_string())
            })?;

        self.refresh_tokens.revoke_by_token_hash(&token_hash).await?;

        log::info!("Token refreshed for user '{}'", user.username);
        self.issue_tokens(&user).await
    }

    async fn issue_tokens(&self, user: &User) -> AppResult<AuthResponse> {
        let token = self.jwt_service.create_token(user)?;
        let refresh_token = self.jwt_service.create_refresh_token(&user.username)?;

        let expires_at =
            Utc::now() + Duration::hours(self.jwt_service.refresh_expiration_hours());
        self.refresh_tokens
            .create(RefreshToken::new(
                &user.username,
                &sha256_hex(&refresh_token),
                expires_at,
            ))
            .await?;

        Ok(AuthResponse {
            token,
            refresh_token,
            username: user.username.clone(),
            email: user.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repositories::refresh_token_repository::MockRefreshTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn jwt_service() -> Arc<JwtService> {
        let config = Config::test_config();
        Arc::new(JwtService::new(&config.jwt_secret, 1, 168))
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn register_issues_tokens_for_new_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(Ok);

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_create().returning(Ok);

        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt_service());
        let response = service.register(register_request()).await.unwrap();

        assert_eq!(response.username, "johndoe");
        assert!(!response.token.is_empty());
        assert!(!response.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(User::test_user("johndoe"))));
        users.expect_create().never();

        let refresh = MockRefreshTokenRepository::new();
        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt_service());

        let result = service.register(register_request()).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_without_leaking_which_part_failed() {
        let stored = User::new(
            "John",
            "Doe",
            "johndoe",
            "john@example.com",
            &hash_password("correct horse"),
        );

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let refresh = MockRefreshTokenRepository::new();
        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt_service());

        let wrong_password = service
            .login(LoginRequest {
                username: "johndoe".to_string(),
                password: "wrong horse".to_string(),
            })
            .await;

        match wrong_password {
            Err(AppError::Unauthorized(msg)) => {
                assert_eq!(msg, "Invalid username or password");
            }
            other => panic!("expected Unauthorized, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn login_succeeds_with_right_password() {
        let stored = User::new(
            "John",
            "Doe",
            "johndoe",
            "john@example.com",
            &hash_password("correct horse"),
        );

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_create().returning(Ok);

        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt_service());
        let response = service
            .login(LoginRequest {
                username: "johndoe".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.email, "john@example.com");
    }

    #[tokio::test]
    async fn refresh_rejects_unknown_token() {
        let jwt = jwt_service();
        let token = jwt.create_refresh_token("johndoe").unwrap();

        let users = MockUserRepository::new();
        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_find_by_token_hash().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt);
        let result = service.refresh(&token).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn refresh_rotates_a_known_active_token() {
        let jwt = jwt_service();
        let token = jwt.create_refresh_token("johndoe").unwrap();
        let record = RefreshToken::new(
            "johndoe",
            &sha256_hex(&token),
            Utc::now() + Duration::days(7),
        );

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(User::test_user("johndoe"))));

        let mut refresh = MockRefreshTokenRepository::new();
        refresh
            .expect_find_by_token_hash()
            .returning(move |_| Ok(Some(record.clone())));
        refresh
            .expect_revoke_by_token_hash()
            .times(1)
            .returning(|_| Ok(()));
        refresh.expect_create().returning(Ok);

        let service = UserService::new(Arc::new(users), Arc::new(refresh), jwt);
        let response = service.refresh(&token).await.unwrap();

        assert_eq!(response.username, "johndoe");
        assert!(!response.refresh_token.is_empty());
    }
}
