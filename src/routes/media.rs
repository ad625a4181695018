use axum::{extract::Path, http::StatusCode, response::IntoResponse};

/// Superseded streaming endpoint. Media ships from the static /uploads
/// tree now; old clients get a firm 410 instead of 404 noise.
#[axum::debug_handler]
pub async fn stream_media(Path(_name): Path<String>) -> impl IntoResponse {
    (
        StatusCode::GONE,
        "Media route deprecated. Use /uploads/* static paths.",
    )
}
