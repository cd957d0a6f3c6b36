//! Session guard middleware

use crate::{error::AppError, services::session_service::SessionService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated caller, attached to request extensions by `require_session`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AppError::MissingToken)
    }
}

/// Token from the Authorization header, with a leading `Bearer ` stripped
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the caller of a request to a user id.
///
/// No token is `MissingToken`; a token without a live session is `InvalidToken`.
pub async fn authenticate(sessions: &SessionService, headers: &HeaderMap) -> Result<Uuid, AppError> {
    let token = extract_token(headers).ok_or(AppError::MissingToken)?;

    sessions
        .validate_session(&token)
        .await?
        .ok_or(AppError::InvalidToken)
}

/// Reject requests without a live session
pub async fn require_session(
    State(sessions): State<Arc<SessionService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = authenticate(&sessions, req.headers()).await?;

    req.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_extract_token_without_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "raw_token".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("raw_token"));
    }

    #[test]
    fn test_extract_token_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer ".parse().unwrap());

        assert!(extract_token(&headers).is_none());
    }
}
