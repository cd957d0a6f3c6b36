//! In-process repositories
//! Used by tests and local runs without a database.

use crate::{
    error::AppError,
    models::{session::SessionRecord, user::User},
    repository::{session_repo::SessionRepository, user_repo::UserRepository},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only session table held in memory
#[derive(Default)]
pub struct MemorySessionRepository {
    records: RwLock<Vec<SessionRecord>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.token == token)
            .max_by_key(|r| r.expires_at)
            .cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
