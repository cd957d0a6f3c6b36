//! Session and credential service
//!
//! Password hashing, token minting and session persistence. Every call is
//! independent; the only shared state is the read-only signing key and the
//! session repository.

use crate::{
    auth::{
        jwt::{TokenClaims, TokenRejection, TokenService},
        password::PasswordHasher,
    },
    error::AppError,
    models::session::SessionRecord,
    repository::session_repo::SessionRepository,
};
use chrono::Utc;
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// Why a session token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// No record for this token
    Absent,
    /// Record found but its stored expiry has passed
    Expired,
}

impl SessionRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRejection::Absent => "absent",
            SessionRejection::Expired => "session_expired",
        }
    }
}

impl fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct SessionService {
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            tokens,
            hasher,
            sessions,
        }
    }

    /// Hash a password on the blocking pool
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
    }

    /// Constant-time comparison of a password against a stored hash
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))?
    }

    pub fn generate_token(&self, user_id: &Uuid) -> Result<String, AppError> {
        self.tokens.generate_token(user_id)
    }

    /// Decoded claims, or `None` for any failure
    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        self.tokens.verify_token(token)
    }

    pub fn inspect_token(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        self.tokens.inspect_token(token)
    }

    /// Mint a token and persist a session record for it.
    ///
    /// Each call appends a new record; earlier sessions stay valid.
    pub async fn create_session(&self, user_id: &Uuid) -> Result<String, AppError> {
        Ok(self.open_session(user_id).await?.token)
    }

    /// Like `create_session` but returns the stored record
    pub async fn open_session(&self, user_id: &Uuid) -> Result<SessionRecord, AppError> {
        let token = self.tokens.generate_token(user_id)?;
        let record = SessionRecord {
            user_id: *user_id,
            token,
            expires_at: Utc::now() + self.tokens.ttl(),
        };

        self.sessions.insert(&record).await?;

        tracing::info!(user_id = %user_id, expires_at = %record.expires_at, "Session created");

        Ok(record)
    }

    /// Resolve a token to its user id, keeping the rejection cause.
    ///
    /// Only the stored record decides: it must exist and its expiry must be in
    /// the future. A live record whose token no longer verifies is logged and
    /// counted but still accepted.
    /// The outer `Result` carries datastore failures.
    pub async fn inspect_session(
        &self,
        token: &str,
    ) -> Result<Result<Uuid, SessionRejection>, AppError> {
        let outcome = match self.sessions.find_by_token(token).await? {
            None => Err(SessionRejection::Absent),
            Some(record) if !record.is_live_at(Utc::now()) => Err(SessionRejection::Expired),
            Some(record) => {
                if let Err(reason) = self.tokens.inspect_token(token) {
                    tracing::debug!(
                        user_id = %record.user_id,
                        reason = %reason,
                        "Live session holds a token that does not verify"
                    );
                    metrics::counter!("session_token_unverified_total", "reason" => reason.as_str())
                        .increment(1);
                }
                Ok(record.user_id)
            }
        };

        if let Err(rejection) = outcome {
            tracing::debug!(reason = %rejection, "Session rejected");
            metrics::counter!("session_rejections_total", "reason" => rejection.as_str())
                .increment(1);
        }

        Ok(outcome)
    }

    /// User id of a live session, or `None`
    pub async fn validate_session(&self, token: &str) -> Result<Option<Uuid>, AppError> {
        Ok(self.inspect_session(token).await?.ok())
    }

    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.sessions.ping().await
    }
}
