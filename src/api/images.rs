//! Image upload endpoint

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
    Extension, Json,
};

use crate::{
    auth::models::User,
    error::ApiError,
    images::{folder_for, ImageMeta},
    response::{created, Envelope},
    state::AppState,
};

const IMAGE_FIELD: &str = "image";

/// Upload image - POST /api/v1/images (multipart field `image`)
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Envelope<ImageMeta>>), ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;

        let meta = state
            .images
            .save(&folder_for(&user), file_name.as_deref(), data.to_vec())
            .await?;

        return Ok(created(meta));
    }

    Err(ApiError::Validation("Please upload an image".to_string()))
}
