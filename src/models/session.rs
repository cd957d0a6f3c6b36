//! Session domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `user_sessions` table. Insert-only; never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Valid only while `now` is strictly before the stored expiry
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let record = SessionRecord {
            user_id: Uuid::new_v4(),
            token: "t".to_string(),
            expires_at: now,
        };

        assert!(!record.is_live_at(now));
        assert!(record.is_live_at(now - Duration::seconds(1)));
        assert!(!record.is_live_at(now + Duration::seconds(1)));
    }
}
