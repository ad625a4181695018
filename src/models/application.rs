use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ApplicationStatus::Pending),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    /// Accepted and rejected are terminal; only pending applications may
    /// transition.
    pub fn is_decided(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

/// The two outcomes a business can pick for a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_status(&self) -> ApplicationStatus {
        match self {
            Decision::Accepted => ApplicationStatus::Accepted,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub advertiser_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Application joined with the applicant's profile, for the business-side
/// review list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithAdvertiser {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub advertiser_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub advertiser_full_name: Option<String>,
    pub advertiser_email: Option<String>,
    pub advertiser_city: Option<String>,
    pub advertiser_state: Option<String>,
    pub advertiser_picture_url: Option<String>,
}

/// Application joined with its campaign, for the advertiser-side history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithCampaign {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub advertiser_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub campaign_title: String,
    pub campaign_status: String,
    pub campaign_location: String,
    pub compensation_amount: Decimal,
    pub compensation_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_open_status() {
        assert!(!ApplicationStatus::Pending.is_decided());
        assert!(ApplicationStatus::Accepted.is_decided());
        assert!(ApplicationStatus::Rejected.is_decided());
    }

    #[test]
    fn decision_maps_to_terminal_status() {
        assert_eq!(Decision::Accepted.as_status(), ApplicationStatus::Accepted);
        assert_eq!(Decision::Rejected.as_status(), ApplicationStatus::Rejected);
        assert!(Decision::Accepted.as_status().is_decided());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("withdrawn"), None);
    }
}
