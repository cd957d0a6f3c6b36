//! Application state and HTTP middleware

use crate::{
    auth::{jwt::TokenService, password::PasswordHasher},
    config::AppConfig,
    error::AppError,
    repository::{session_repo::SessionRepository, user_repo::UserRepository},
    services::{AccountService, SessionService},
};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub account_service: Arc<AccountService>,
}

impl AppState {
    /// Wire services over the given repositories
    pub fn new(
        config: &AppConfig,
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::from_config(config)?);
        let session_service = Arc::new(SessionService::new(tokens, PasswordHasher::new(), sessions));
        let account_service = Arc::new(AccountService::new(users, session_service.clone()));

        Ok(Self {
            session_service,
            account_service,
        })
    }
}

/// Per-request span with trace and request ids, plus request metrics
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
