use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::Session;
use crate::utils::token::{generate_session_token, hash_session_token};

#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mints a new opaque session token for the user. The raw token goes
    /// back to the caller exactly once; only its hash is persisted.
    pub async fn create(&self, user_id: &str, ttl_hours: i64) -> Result<(String, Session)> {
        let token = generate_session_token();
        let token_hash = hash_session_token(&token);
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&token_hash)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok((token, session))
    }

    /// Resolves a cookie token to its live session, or None when the
    /// token is unknown, expired, or revoked.
    pub async fn validate(&self, token: &str) -> Result<Option<Session>> {
        let token_hash = hash_session_token(token);

        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT * FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session.filter(|s| s.is_valid_at(Utc::now())))
    }

    /// Server-side invalidation: the row survives for audit but never
    /// validates again.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let token_hash = hash_session_token(token);

        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(&token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
