//! Account service: register, login, current user

use crate::{
    auth::password::DUMMY_PASSWORD_HASH,
    error::AppError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
    repository::user_repo::UserRepository,
    services::session_service::SessionService,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionService>) -> Self {
        Self { users, sessions }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        req.validate()?;

        let email = req.email.trim().to_lowercase();
        let password_hash = self.sessions.hash_password(&req.password).await?;
        let user = self.users.create(&email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    /// Check credentials and open a new session
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        req.validate()?;

        let email = req.email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            self.sessions.verify_password(&req.password, DUMMY_PASSWORD_HASH).await?;
            tracing::info!("Login failed: unknown account");
            return Err(AppError::InvalidCredentials);
        };

        if !self.sessions.verify_password(&req.password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let session = self.sessions.open_session(&user.id).await?;

        Ok(LoginResponse {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            user: UserResponse::from(user),
        })
    }

    pub async fn current_user(&self, user_id: &Uuid) -> Result<UserResponse, AppError> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        Ok(UserResponse::from(user))
    }
}
