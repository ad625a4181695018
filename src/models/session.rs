use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Server-side session record. Only the SHA-256 digest of the cookie
/// token is stored; the token itself never touches the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            token_hash: "abc".to_string(),
            user_id: "user_1".to_string(),
            created_at: Some(now),
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn live_session_is_valid() {
        assert!(session(Duration::hours(1), false).is_valid_at(Utc::now()));
    }

    #[test]
    fn expired_session_is_rejected() {
        assert!(!session(Duration::hours(-1), false).is_valid_at(Utc::now()));
    }

    #[test]
    fn revoked_session_is_rejected_even_before_expiry() {
        assert!(!session(Duration::hours(1), true).is_valid_at(Utc::now()));
    }
}
