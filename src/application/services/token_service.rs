//! JWT issuing and verification for access and refresh tokens.
//!
//! Both kinds are HS256 JWTs with the same claim set; they differ only in
//! lifetime and signing secret, so a token of one kind never verifies as the
//! other.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `iss` claim.
pub const ISSUER: &str = "urlShortener";

/// Registered claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    /// Parses `sub` as a user id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if `sub` is not a UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| {
            AppError::unauthenticated("Unauthorized", json!({ "reason": "Invalid subject" }))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs a token for `user_id` valid for `validity` from now.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if signing fails.
pub fn issue(user_id: Uuid, validity: Duration, secret: &[u8]) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(validity).ok_or_else(|| {
        AppError::internal(
            "Token lifetime out of range",
            json!({ "validity_seconds": validity.num_seconds() }),
        )
    })?;
    let claims = Claims {
        sub: user_id.to_string(),
        iss: ISSUER.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::internal("Failed to sign token", json!({ "reason": e.to_string() })))
}

/// Issues and verifies tokens with per-kind secrets and lifetimes.
pub struct TokenService {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(
        access_secret: impl Into<Vec<u8>>,
        refresh_secret: impl Into<Vec<u8>>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl,
            refresh_ttl,
            validation,
        }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(&self, kind: TokenKind, user_id: Uuid) -> Result<String, AppError> {
        issue(user_id, self.ttl(kind), self.secret(kind))
    }

    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, user_id)?,
            refresh_token: self.issue(TokenKind::Refresh, user_id)?,
        })
    }

    /// Verifies signature, algorithm, issuer and expiry.
    ///
    /// # Errors
    ///
    /// - [`AppError::TokenExpired`] if the token is authentic but past `exp`
    /// - [`AppError::Unauthenticated`] for any other failure
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &self.validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired("Token expired"),
            _ => AppError::unauthenticated("Unauthorized", json!({ "reason": "Invalid token" })),
        })
    }

    /// HMAC-SHA256 of a refresh token keyed by the refresh secret.
    ///
    /// Returns a 64-character lowercase hex string. Only this digest is stored.
    pub fn digest(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.refresh_secret)
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
