use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::AdvertiserStats;
use crate::error::{is_unique_violation, Error, Result};
use crate::models::application::{
    Application, ApplicationWithAdvertiser, ApplicationWithCampaign, Decision,
};
use crate::utils::validation::normalize_optional;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One application per (campaign, advertiser); the unique constraint
    /// is the arbiter, and a hit becomes the dedicated conflict message.
    pub async fn create(
        &self,
        campaign_id: Uuid,
        advertiser_id: &str,
        message: Option<String>,
    ) -> Result<Application> {
        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (campaign_id, advertiser_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(advertiser_id)
        .bind(normalize_optional(message))
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(application) => Ok(application),
            Err(err) if is_unique_violation(&err) => Err(Error::Conflict(
                "You have already applied to this campaign".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Application>> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(application)
    }

    /// Applications for one campaign with the applicant profile joined
    /// in, newest first.
    pub async fn list_for_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ApplicationWithAdvertiser>> {
        let applications = sqlx::query_as::<_, ApplicationWithAdvertiser>(
            r#"
            SELECT
                a.*,
                p.full_name AS advertiser_full_name,
                p.email AS advertiser_email,
                p.city AS advertiser_city,
                p.state AS advertiser_state,
                p.profile_picture_url AS advertiser_picture_url
            FROM applications a
            LEFT JOIN user_profiles p ON p.id = a.advertiser_id
            WHERE a.campaign_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    pub async fn list_for_advertiser(
        &self,
        advertiser_id: &str,
    ) -> Result<Vec<ApplicationWithCampaign>> {
        let applications = sqlx::query_as::<_, ApplicationWithCampaign>(
            r#"
            SELECT
                a.*,
                c.title AS campaign_title,
                c.status AS campaign_status,
                c.location AS campaign_location,
                c.compensation_amount,
                c.compensation_type
            FROM applications a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE a.advertiser_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(advertiser_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Accept or reject in one conditional update: the row must still be
    /// pending and must belong to a campaign of the calling business.
    /// Zero rows updated means the transition already happened (conflict)
    /// or the application is not the caller's to decide.
    pub async fn decide(
        &self,
        application_id: Uuid,
        business_id: &str,
        decision: Decision,
    ) -> Result<Application> {
        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications a
            SET status = $3, updated_at = NOW()
            FROM campaigns c
            WHERE a.id = $1
              AND a.status = 'pending'
              AND c.id = a.campaign_id
              AND c.business_id = $2
            RETURNING a.*
            "#,
        )
        .bind(application_id)
        .bind(business_id)
        .bind(decision.as_status().as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(application) = updated {
            return Ok(application);
        }

        // Disambiguate the miss: whoever took the transition first owns it.
        let existing = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT a.status, c.business_id
            FROM applications a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE a.id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some((_, owner)) if owner == business_id => Err(Error::Conflict(
                "Application has already been decided".to_string(),
            )),
            _ => Err(Error::NotFound("Application not found".to_string())),
        }
    }

    pub async fn advertiser_stats(&self, advertiser_id: &str) -> Result<AdvertiserStats> {
        let (total, pending, accepted, rejected) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'accepted'),
                COUNT(*) FILTER (WHERE status = 'rejected')
            FROM applications
            WHERE advertiser_id = $1
            "#,
        )
        .bind(advertiser_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(AdvertiserStats {
            total_applications: total,
            pending_applications: pending,
            accepted_applications: accepted,
            rejected_applications: rejected,
        })
    }
}
