use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::campaign_dto::SuggestedCampaign;
use crate::models::application::{
    Application, ApplicationWithAdvertiser, ApplicationWithCampaign, Decision,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ApplyPayload {
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub status: Decision,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub advertiser_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            campaign_id: value.campaign_id,
            advertiser_id: value.advertiser_id,
            status: value.status,
            message: value.message,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserSummary {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Review-list entry: the application plus who applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignApplicationResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub advertiser: AdvertiserSummary,
}

impl From<ApplicationWithAdvertiser> for CampaignApplicationResponse {
    fn from(value: ApplicationWithAdvertiser) -> Self {
        Self {
            id: value.id,
            campaign_id: value.campaign_id,
            status: value.status,
            message: value.message,
            created_at: value.created_at,
            updated_at: value.updated_at,
            advertiser: AdvertiserSummary {
                id: value.advertiser_id,
                full_name: value.advertiser_full_name,
                email: value.advertiser_email,
                city: value.advertiser_city,
                state: value.advertiser_state,
                profile_picture_url: value.advertiser_picture_url,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub location: String,
    pub compensation_amount: Decimal,
    pub compensation_type: String,
}

/// History entry on the advertiser side: the application plus what it was
/// for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyApplicationResponse {
    pub id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub campaign: CampaignSummary,
}

impl From<ApplicationWithCampaign> for MyApplicationResponse {
    fn from(value: ApplicationWithCampaign) -> Self {
        Self {
            id: value.id,
            status: value.status,
            message: value.message,
            created_at: value.created_at,
            updated_at: value.updated_at,
            campaign: CampaignSummary {
                id: value.campaign_id,
                title: value.campaign_title,
                status: value.campaign_status,
                location: value.campaign_location,
                compensation_amount: value.compensation_amount,
                compensation_type: value.compensation_type,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserStats {
    pub total_applications: i64,
    pub pending_applications: i64,
    pub accepted_applications: i64,
    pub rejected_applications: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserDashboardResponse {
    pub stats: AdvertiserStats,
    pub applications: Vec<MyApplicationResponse>,
    pub suggested: Vec<SuggestedCampaign>,
}
