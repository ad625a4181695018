use sqlx::PgPool;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::waitlist::WaitlistSignup;

/// Pre-launch signup list. Emails are unique; a repeat signup is a
/// conflict rather than a silent upsert so the client can tell the
/// visitor they are already on the list.
#[derive(Clone)]
pub struct WaitlistService {
    pool: PgPool,
}

impl WaitlistService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str) -> Result<WaitlistSignup> {
        let signup = sqlx::query_as::<_, WaitlistSignup>(
            r#"
            INSERT INTO waitlist_signups (email)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::Conflict("Already signed up".to_string())
            } else {
                Error::from(err)
            }
        })?;

        Ok(signup)
    }

    pub async fn list(&self) -> Result<Vec<WaitlistSignup>> {
        let signups = sqlx::query_as::<_, WaitlistSignup>(
            "SELECT * FROM waitlist_signups ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(signups)
    }
}
