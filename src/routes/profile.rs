use std::path::Path as StdPath;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Json},
    Extension,
};
use tokio::fs;
use tracing::warn;
use validator::Validate;

use crate::{
    config::get_config,
    dto::profile_dto::{
        AdvertiserProfilePayload, BusinessProfilePayload, PictureUploadResponse, ProfileResponse,
    },
    error::{Error, Result},
    middleware::auth::{CurrentProfile, SessionUser},
    AppState,
};

const MAX_PICTURE_BYTES: usize = 8 * 1024 * 1024;
const PICTURE_SUBDIR: &str = "profile_pictures";

#[axum::debug_handler]
pub async fn get_business_profile(
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> impl IntoResponse {
    Json(ProfileResponse::from(profile))
}

#[axum::debug_handler]
pub async fn update_business_profile(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(payload): Json<BusinessProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state
        .profile_service
        .update_business(&profile.id, payload)
        .await?;
    Ok(Json(ProfileResponse::from(updated)))
}

#[axum::debug_handler]
pub async fn get_advertiser_profile(
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
) -> impl IntoResponse {
    Json(ProfileResponse::from(profile))
}

#[axum::debug_handler]
pub async fn update_advertiser_profile(
    State(state): State<AppState>,
    Extension(CurrentProfile(profile)): Extension<CurrentProfile>,
    Json(payload): Json<AdvertiserProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state
        .profile_service
        .update_advertiser(&profile.id, payload)
        .await?;
    Ok(Json(ProfileResponse::from(updated)))
}

async fn save_picture_file(filename: &str, data: &bytes::Bytes) -> Result<String> {
    if data.len() > MAX_PICTURE_BYTES {
        return Err(Error::BadRequest(
            "File is too large. Maximum size is 8MB.".to_string(),
        ));
    }

    let ext = StdPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let allowed_exts = ["jpg", "jpeg", "png", "webp"];
    if !allowed_exts.contains(&ext.as_str()) {
        return Err(Error::BadRequest(
            "Invalid file type. Only JPEG, PNG, and WebP are allowed.".to_string(),
        ));
    }

    // The extension names a format; the first bytes have to agree.
    let content_ok = match ext.as_str() {
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        _ => false,
    };
    if !content_ok {
        return Err(Error::BadRequest(
            "Invalid file type. Only JPEG, PNG, and WebP are allowed.".to_string(),
        ));
    }

    let upload_dir = format!(
        "{}/{}",
        get_config().uploads_dir.trim_end_matches('/'),
        PICTURE_SUBDIR
    );
    fs::create_dir_all(&upload_dir).await?;

    let safe_filename = format!("{}.{}", uuid::Uuid::new_v4(), ext);
    let file_path = format!("{}/{}", upload_dir, safe_filename);
    fs::write(&file_path, data).await.map_err(|e| {
        tracing::error!("Failed to write picture file: {}", e);
        Error::Internal(format!("Failed to save file: {}", e))
    })?;

    Ok(format!("/uploads/{}/{}", PICTURE_SUBDIR, safe_filename))
}

/// Multipart upload under the "file" field. The stored name is a fresh
/// UUID, so nothing the client sends reaches the filesystem.
#[axum::debug_handler]
pub async fn upload_picture(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("picture.bin").to_string();
            let data = field.bytes().await?;

            let url = save_picture_file(&filename, &data).await?;
            state
                .profile_service
                .set_picture_url(&user.user_id, &url)
                .await?;
            return Ok(Json(PictureUploadResponse {
                profile_picture_url: url,
            }));
        }
    }

    Err(Error::BadRequest("No file field in upload".to_string()))
}

/// Clears the picture URL; the file itself is removed best-effort and
/// the row update proceeds either way.
#[axum::debug_handler]
pub async fn delete_picture(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse> {
    let profile = state
        .profile_service
        .get(&user.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    if let Some(rel) = profile
        .profile_picture_url
        .as_deref()
        .and_then(|url| url.strip_prefix("/uploads/"))
    {
        let path = format!("{}/{}", get_config().uploads_dir.trim_end_matches('/'), rel);
        if let Err(err) = fs::remove_file(&path).await {
            warn!("could not remove picture file {}: {err}", path);
        }
    }

    let updated = state.profile_service.clear_picture_url(&user.user_id).await?;
    Ok(Json(ProfileResponse::from(updated)))
}
