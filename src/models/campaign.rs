use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Paused,
    Closed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationType {
    Hourly,
    Daily,
    PerEvent,
}

impl CompensationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationType::Hourly => "hourly",
            CompensationType::Daily => "daily",
            CompensationType::PerEvent => "per_event",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub business_id: String,
    pub title: String,
    pub description: String,
    pub compensation_amount: Decimal,
    pub compensation_type: String,
    pub location: String,
    pub duration_hours: Option<i32>,
    pub requirements: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active.as_str()
    }
}

/// Campaign row joined with its application counters, for the business
/// dashboard listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignWithCounts {
    pub id: Uuid,
    pub business_id: String,
    pub title: String,
    pub description: String,
    pub compensation_amount: Decimal,
    pub compensation_type: String,
    pub location: String,
    pub duration_hours: Option<i32>,
    pub requirements: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub application_count: i64,
    pub pending_count: i64,
}
