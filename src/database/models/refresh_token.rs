use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record of an issued refresh credential. Revocation is
/// one-way: once revoked_at is set the jti is never accepted again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn revoked_token_is_unusable() {
        let now = Utc::now();
        let token = RefreshToken {
            jti: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + Duration::days(7),
            revoked_at: Some(now),
        };
        assert!(!token.is_usable(now));
    }

    #[test]
    fn expired_token_is_unusable() {
        let now = Utc::now();
        let token = RefreshToken {
            jti: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            issued_at: now - Duration::days(8),
            expires_at: now - Duration::days(1),
            revoked_at: None,
        };
        assert!(!token.is_usable(now));
        assert!(token.is_usable(now - Duration::days(2)));
    }
}
