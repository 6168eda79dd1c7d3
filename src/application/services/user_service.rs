//! Profile read and update.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::hash_password;

const NAME_MAX_CHARS: usize = 100;
const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 128;

/// A single-field profile change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    Email(String),
    Name(String),
    Password(String),
}

impl ProfileUpdate {
    /// Builds an update from the `{type, value}` wire pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown `type`.
    pub fn from_parts(kind: &str, value: String) -> Result<Self, AppError> {
        match kind {
            "email" => Ok(Self::Email(value.trim().to_string())),
            "name" => Ok(Self::Name(value)),
            "password" => Ok(Self::Password(value)),
            other => Err(AppError::bad_request(
                "Unknown profile field",
                json!({ "type": other, "allowed": ["email", "name", "password"] }),
            )),
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        match self {
            Self::Email(email) if !email.validate_email() => Err(AppError::bad_request(
                "Invalid email address",
                json!({ "value": email }),
            )),
            Self::Name(name) => {
                let len = name.trim().chars().count();
                if len == 0 || len > NAME_MAX_CHARS {
                    return Err(AppError::bad_request(
                        "Name must be 1-100 characters",
                        json!({ "provided_length": len }),
                    ));
                }
                Ok(())
            }
            Self::Password(password) => {
                let len = password.chars().count();
                if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
                    return Err(AppError::bad_request(
                        "Password must be 8-128 characters",
                        json!({ "provided_length": len }),
                    ));
                }
                Ok(())
            }
            Self::Email(_) => Ok(()),
        }
    }
}

/// Service for the authenticated user's own profile.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Applies a profile change.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the new value is invalid.
    /// Returns [`AppError::Conflict`] if a new email is already registered.
    /// Returns [`AppError::NotFound`] if the user was removed meanwhile.
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<(), AppError> {
        update.validate()?;

        match update {
            ProfileUpdate::Email(email) => self.users.update_email(user_id, &email).await,
            ProfileUpdate::Name(name) => self.users.update_name(user_id, name.trim()).await,
            ProfileUpdate::Password(password) => {
                let hash = tokio::task::spawn_blocking(move || hash_password(&password))
                    .await
                    .map_err(|e| {
                        AppError::internal("Password task failed", json!({ "reason": e.to_string() }))
                    })?
                    .map_err(|e| {
                        AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
                    })?;
                self.users.update_password(user_id, &hash).await
            }
        }
    }
}
