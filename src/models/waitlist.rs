use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaitlistSignup {
    pub id: i64,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}
