//! User entity and registration input.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// A registered account.
///
/// `password_hash` is an argon2 PHC string. It is redacted from `Debug`
/// output so it never ends up in logs.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input data for creating a user. The password is already hashed.
///
/// The id is chosen by the caller so that the first token pair can be
/// issued before the row is written.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };

        let printed = format!("{:?}", user);

        assert!(printed.contains("ada@example.com"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("$argon2id"));
    }
}
