//! Registration, login, token renewal and the bearer-token gate.

use std::sync::{Arc, LazyLock};

use serde_json::json;
use uuid::Uuid;

use crate::application::services::token_service::{TokenKind, TokenPair, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{RefreshTokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Verified against when the email is unknown so that both login failure
/// paths cost one argon2 verification. Only touched on blocking threads,
/// since the first access runs a full argon2 hash.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-for-timing").ok());

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful register or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Service coordinating users, token issuing and the refresh store.
///
/// Raw refresh tokens are never persisted; the store only sees
/// [`TokenService::digest`] values.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    tokens: Arc<TokenService>,
}

fn invalid_credentials() -> AppError {
    AppError::unauthenticated("Invalid email or password", json!({}))
}

fn invalid_refresh_token() -> AppError {
    AppError::unauthenticated(
        "Unauthorized",
        json!({ "reason": "Refresh token is not valid" }),
    )
}

fn blocking_failed(e: tokio::task::JoinError) -> AppError {
    AppError::internal("Password task failed", json!({ "reason": e.to_string() }))
}

/// Extracts the token from an `Authorization` value of the exact form
/// `Bearer <token>`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or_else(|| {
        AppError::unauthenticated(
            "Unauthorized",
            json!({ "reason": "Missing Authorization header" }),
        )
    })?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthenticated(
            "Unauthorized",
            json!({ "reason": "Malformed Authorization header" }),
        )),
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
        }
    }

    /// Creates an account and its first refresh credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    /// Returns [`AppError::Internal`] on hashing, signing or database errors.
    pub async fn register(&self, input: Registration) -> Result<AuthSession, AppError> {
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(blocking_failed)?
            .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))?;

        let user_id = Uuid::new_v4();
        let tokens = self.tokens.issue_pair(user_id)?;

        let user = self
            .users
            .create(
                NewUser {
                    id: user_id,
                    name: input.name,
                    email: input.email,
                    password_hash,
                },
                &self.tokens.digest(&tokens.refresh_token),
            )
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession { user, tokens })
    }

    /// Checks credentials and replaces the stored refresh credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unknown email or a wrong
    /// password; the two cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let user = self.users.find_by_email(email).await?;

        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let password = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || {
            stored_hash
                .as_deref()
                .or_else(|| DUMMY_HASH.as_deref())
                .is_some_and(|hash| verify_password(&password, hash).unwrap_or(false))
        })
        .await
        .map_err(blocking_failed)?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::debug!("Login rejected");
                return Err(invalid_credentials());
            }
        };

        let tokens = self.tokens.issue_pair(user.id)?;
        self.refresh_tokens
            .upsert(user.id, &self.tokens.digest(&tokens.refresh_token))
            .await?;

        Ok(AuthSession { user, tokens })
    }

    /// Exchanges a refresh token for a new pair, rotating the stored credential.
    ///
    /// The store is written only by the final compare-and-swap, so a failed
    /// renewal leaves it untouched.
    ///
    /// # Errors
    ///
    /// - [`AppError::TokenExpired`] if the refresh token is past its expiry
    /// - [`AppError::Unauthenticated`] if it is forged, signed with the access
    ///   secret, already rotated, logged out, or its user is gone
    pub async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.tokens.verify(TokenKind::Refresh, refresh_token)?;
        let user_id = claims.user_id()?;

        let old_hash = self.tokens.digest(refresh_token);
        self.refresh_tokens
            .find_by_token(&old_hash)
            .await?
            .filter(|credential| credential.user_id == user_id)
            .ok_or_else(invalid_refresh_token)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(invalid_refresh_token)?;

        let tokens = self.tokens.issue_pair(user.id)?;
        let new_hash = self.tokens.digest(&tokens.refresh_token);

        if !self
            .refresh_tokens
            .rotate(user.id, &old_hash, &new_hash)
            .await?
        {
            tracing::warn!(user_id = %user.id, "Concurrent refresh token rotation lost");
            return Err(invalid_refresh_token());
        }

        Ok(tokens)
    }

    /// Deletes the refresh credential of `user_id`. Idempotent.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AppError> {
        self.refresh_tokens.delete_by_user_id(user_id).await
    }

    /// Resolves an `Authorization` header value to a user.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] if the header is missing or malformed,
    ///   the token is not a valid access token, or the user does not exist
    /// - [`AppError::TokenExpired`] if the access token is past its expiry
    pub async fn authenticate(&self, header: Option<&str>) -> Result<User, AppError> {
        let token = parse_bearer(header)?;
        let claims = self.tokens.verify(TokenKind::Access, token)?;
        let user_id = claims.user_id()?;

        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthenticated("Unauthorized", json!({ "reason": "Unknown user" }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::token_service::issue;
    use crate::domain::entities::RefreshCredential;
    use crate::domain::repositories::{MockRefreshTokenRepository, MockUserRepository};
    use chrono::{Duration, Utc};

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            "access-secret",
            "refresh-secret",
            Duration::minutes(15),
            Duration::days(7),
        ))
    }

    fn test_user(id: Uuid, password_hash: String) -> User {
        User {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    fn credential(user_id: Uuid, token_hash: String) -> RefreshCredential {
        RefreshCredential {
            id: 1,
            user_id,
            token_hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        users: MockUserRepository,
        refresh: MockRefreshTokenRepository,
        tokens: Arc<TokenService>,
    ) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(refresh), tokens)
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert!(parse_bearer(None).is_err());
        assert!(parse_bearer(Some("bearer abc")).is_err());
        assert!(parse_bearer(Some("Bearer")).is_err());
        assert!(parse_bearer(Some("Bearer ")).is_err());
        assert!(parse_bearer(Some("Bearer a b")).is_err());
        assert!(parse_bearer(Some("Basic abc")).is_err());
    }

    #[tokio::test]
    async fn test_register_inserts_digest_of_refresh_token() {
        let tokens = token_service();

        let stored = Arc::new(std::sync::Mutex::new(None::<(Uuid, String)>));
        let captured = stored.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|new_user, hash| {
                new_user.email == "ada@example.com"
                    && new_user.password_hash.starts_with("$argon2")
                    && hash.len() == 64
            })
            .times(1)
            .returning(move |new_user, hash| {
                *captured.lock().unwrap() = Some((new_user.id, hash.to_string()));
                Ok(test_user(new_user.id, new_user.password_hash))
            });

        // The first credential is written by the user repository, in the
        // same transaction as the user row.
        let refresh = MockRefreshTokenRepository::new();

        let svc = service(users, refresh, tokens.clone());
        let session = svc
            .register(Registration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        let (user_id, hash) = stored.lock().unwrap().clone().unwrap();
        assert_eq!(session.user.id, user_id);
        assert_eq!(hash, tokens.digest(&session.tokens.refresh_token));
        let claims = tokens
            .verify(TokenKind::Refresh, &session.tokens.refresh_token)
            .unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_issues_nothing() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .times(1)
            .returning(|_, _| Err(AppError::conflict("Email already exists", json!({}))));

        let svc = service(users, MockRefreshTokenRepository::new(), token_service());
        let result = svc
            .register(Registration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_login_success_upserts() {
        let user_id = Uuid::new_v4();
        let hash = hash_password("s3cret-pass").unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(test_user(user_id, hash.clone()))));

        let mut refresh = MockRefreshTokenRepository::new();
        refresh
            .expect_upsert()
            .withf(move |id, _| *id == user_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = service(users, refresh, token_service());
        let session = svc.login("ada@example.com", "s3cret-pass").await.unwrap();

        assert_eq!(session.user.id, user_id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let hash = hash_password("s3cret-pass").unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(test_user(Uuid::new_v4(), hash.clone()))));

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_upsert().never();

        let svc = service(users, refresh, token_service());
        let result = svc.login("ada@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let svc = service(users, MockRefreshTokenRepository::new(), token_service());
        let err = svc.login("nobody@example.com", "whatever").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated { .. }));
        assert_eq!(err.to_string(), invalid_credentials().to_string());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_login_unknown_email_on_single_threaded_runtime() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(2).returning(|_| Ok(None));

        let svc = service(users, MockRefreshTokenRepository::new(), token_service());

        for _ in 0..2 {
            let err = svc.login("nobody@example.com", "whatever").await.unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated { .. }));
        }
    }

    #[tokio::test]
    async fn test_renew_rotates_with_compare_and_swap() {
        let tokens = token_service();
        let user_id = Uuid::new_v4();
        let presented = tokens.issue(TokenKind::Refresh, user_id).unwrap();
        let old_hash = tokens.digest(&presented);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(test_user(id, String::new()))));

        let mut refresh = MockRefreshTokenRepository::new();
        let stored = old_hash.clone();
        refresh
            .expect_find_by_token()
            .returning(move |hash| Ok(Some(credential(user_id, hash.to_string()))));
        refresh
            .expect_rotate()
            .withf(move |id, old, new| *id == user_id && old == stored && new != stored)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let svc = service(users, refresh, tokens.clone());
        let pair = svc.renew(&presented).await.unwrap();

        assert_ne!(pair.refresh_token, presented);
        assert!(tokens.verify(TokenKind::Access, &pair.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_renew_expired_never_touches_store() {
        let user_id = Uuid::new_v4();
        let expired = issue(user_id, Duration::seconds(-5), b"refresh-secret").unwrap();

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_find_by_token().never();
        refresh.expect_rotate().never();

        let svc = service(MockUserRepository::new(), refresh, token_service());
        let result = svc.renew(&expired).await;

        assert!(matches!(result, Err(AppError::TokenExpired { .. })));
    }

    #[tokio::test]
    async fn test_renew_rejects_access_token() {
        let tokens = token_service();
        let access = tokens.issue(TokenKind::Access, Uuid::new_v4()).unwrap();

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_rotate().never();

        let svc = service(MockUserRepository::new(), refresh, tokens);
        let result = svc.renew(&access).await;

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_renew_rejects_rotated_token() {
        let tokens = token_service();
        let presented = tokens.issue(TokenKind::Refresh, Uuid::new_v4()).unwrap();

        let mut refresh = MockRefreshTokenRepository::new();
        refresh.expect_find_by_token().returning(|_| Ok(None));
        refresh.expect_rotate().never();

        let svc = service(MockUserRepository::new(), refresh, tokens);
        let result = svc.renew(&presented).await;

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_renew_lost_race_is_unauthenticated() {
        let tokens = token_service();
        let user_id = Uuid::new_v4();
        let presented = tokens.issue(TokenKind::Refresh, user_id).unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(test_user(id, String::new()))));

        let mut refresh = MockRefreshTokenRepository::new();
        refresh
            .expect_find_by_token()
            .returning(move |hash| Ok(Some(credential(user_id, hash.to_string()))));
        refresh.expect_rotate().times(1).returning(|_, _, _| Ok(false));

        let svc = service(users, refresh, tokens);
        let result = svc.renew(&presented).await;

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_refresh_signed_token() {
        let tokens = token_service();
        let refresh_token = tokens.issue(TokenKind::Refresh, Uuid::new_v4()).unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let svc = service(users, MockRefreshTokenRepository::new(), tokens);
        let header = format!("Bearer {refresh_token}");
        let result = svc.authenticate(Some(&header)).await;

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let tokens = token_service();
        let access = tokens.issue(TokenKind::Access, Uuid::new_v4()).unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).returning(|_| Ok(None));

        let svc = service(users, MockRefreshTokenRepository::new(), tokens);
        let header = format!("Bearer {access}");

        assert!(matches!(
            svc.authenticate(Some(&header)).await,
            Err(AppError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let tokens = token_service();
        let user_id = Uuid::new_v4();
        let access = tokens.issue(TokenKind::Access, user_id).unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |id| Ok(Some(test_user(id, String::new()))));

        let svc = service(users, MockRefreshTokenRepository::new(), tokens);
        let header = format!("Bearer {access}");
        let user = svc.authenticate(Some(&header)).await.unwrap();

        assert_eq!(user.id, user_id);
    }
}
