//! Signed session tokens (HS256 JWT)
//! A token carries the user id and an expiry claim; nothing else.

use crate::{
    config::{AppConfig, MAX_SESSION_TTL_SECS, MIN_SESSION_TTL_SECS},
    error::AppError,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject user id
    #[serde(rename = "userId")]
    pub user_id: Uuid,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Why a token was refused. Kept internal; callers outside the crate see a
/// single generic rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    Expired,
    SignatureInvalid,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::Expired => "expired",
            TokenRejection::SignatureInvalid => "signature_invalid",
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let ttl = i64::try_from(ttl_secs)
            .ok()
            .filter(|_| (MIN_SESSION_TTL_SECS..=MAX_SESSION_TTL_SECS).contains(&ttl_secs))
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "token lifetime {}s outside {}..={}s",
                    ttl_secs, MIN_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS
                ))
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret().as_bytes(),
            config.security.session_ttl_secs,
        )
    }

    /// Lifetime of minted tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `{userId}` with an expiry `ttl` from now
    pub fn generate_token(&self, user_id: &Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            user_id: *user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl()).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Token(e.to_string())
        })
    }

    /// Decode and check signature and expiry, keeping the failure cause
    pub fn inspect_token(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let rejection = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::InvalidSignature => TokenRejection::SignatureInvalid,
                    _ => TokenRejection::Malformed,
                };
                tracing::debug!(reason = %rejection, "Token validation failed");
                rejection
            })
    }

    /// Decode and check a token; any failure collapses to `None`
    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        self.inspect_token(token).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_32_characters_long!";

    fn service() -> TokenService {
        TokenService::new(SECRET, 604_800).unwrap()
    }

    #[test]
    fn test_generate_and_verify_token() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_token(&user_id).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_claims_use_user_id_key() {
        let claims = TokenClaims {
            user_id: Uuid::nil(),
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("userId").is_some());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(TokenService::new(b"short", 60).is_err());
    }

    #[test]
    fn test_ttl_out_of_range_rejected() {
        assert!(TokenService::new(SECRET, u64::MAX).is_err());
        assert!(TokenService::new(SECRET, i64::MAX as u64 + 1).is_err());
        assert!(TokenService::new(SECRET, 0).is_err());
        assert!(TokenService::new(SECRET, MAX_SESSION_TTL_SECS + 1).is_err());

        let service = TokenService::new(SECRET, MAX_SESSION_TTL_SECS).unwrap();
        assert_eq!(service.ttl(), Duration::days(30));
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(service.inspect_token(&token), Err(TokenRejection::Expired));
        assert!(service.verify_token(&token).is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let other = TokenService::new(b"another_secret_key_32_characters_long", 60).unwrap();
        let token = other.generate_token(&Uuid::new_v4()).unwrap();

        assert_eq!(service().inspect_token(&token), Err(TokenRejection::SignatureInvalid));
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(service().inspect_token("invalid_token"), Err(TokenRejection::Malformed));
        assert!(service().verify_token("").is_none());
    }
}
