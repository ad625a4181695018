use sqlx::PgPool;

use crate::dto::profile_dto::{AdvertiserProfilePayload, BusinessProfilePayload, OnboardingPayload};
use crate::error::{is_unique_violation, Error, Result};
use crate::models::profile::{UserProfile, UserType};
use crate::utils::validation::normalize_optional;

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(profile)
    }

    /// One-time profile creation at onboarding. The id is the auth
    /// subject, so a second insert for the same user hits the primary
    /// key and surfaces as a conflict.
    pub async fn create(&self, user_id: &str, payload: OnboardingPayload) -> Result<UserProfile> {
        let company_name = normalize_optional(payload.company_name);
        if payload.user_type == UserType::Business && company_name.is_none() {
            return Err(Error::BadRequest(
                "Company name is required for business accounts".to_string(),
            ));
        }

        let inserted = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (id, email, full_name, user_type, company_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.email)
        .bind(normalize_optional(payload.full_name))
        .bind(payload.user_type.as_str())
        .bind(company_name)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(profile) => Ok(profile),
            Err(err) if is_unique_violation(&err) => {
                Err(Error::Conflict("Profile already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_business(
        &self,
        user_id: &str,
        payload: BusinessProfilePayload,
    ) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET
                company_name = $2,
                email = $3,
                phone = $4,
                industry = $5,
                description = $6,
                address = $7,
                city = $8,
                state = $9,
                updated_at = NOW()
            WHERE id = $1 AND user_type = 'business'
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.company_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(normalize_optional(payload.industry))
        .bind(normalize_optional(payload.description))
        .bind(normalize_optional(payload.address))
        .bind(normalize_optional(payload.city))
        .bind(normalize_optional(payload.state).map(|s| s.to_uppercase()))
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| Error::NotFound("Business profile not found".to_string()))
    }

    pub async fn update_advertiser(
        &self,
        user_id: &str,
        payload: AdvertiserProfilePayload,
    ) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET
                full_name = $2,
                email = $3,
                phone = $4,
                city = $5,
                state = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_type = 'advertiser'
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(normalize_optional(payload.city))
        .bind(normalize_optional(payload.state).map(|s| s.to_uppercase()))
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| Error::NotFound("Advertiser profile not found".to_string()))
    }

    pub async fn set_picture_url(&self, user_id: &str, url: &str) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET profile_picture_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| Error::NotFound("Profile not found".to_string()))
    }

    pub async fn clear_picture_url(&self, user_id: &str) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET profile_picture_url = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| Error::NotFound("Profile not found".to_string()))
    }
}
