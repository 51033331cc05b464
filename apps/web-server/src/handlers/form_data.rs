//! Multipart decoding for the post form.

use actix_multipart::{Field, Multipart};
use futures::StreamExt;

use yatube_core::forms::{ImageUpload, PostForm};

use crate::middleware::error::{AppError, AppResult};

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted text field.
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Read `text`, `group`, `image` and `image-clear` from a multipart body.
/// Unknown fields are drained and ignored.
pub async fn read_post_form(mut payload: Multipart) -> AppResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "text" => form.text = read_text(&mut field).await?,
            "group" => form.group = Some(read_text(&mut field).await?),
            "image" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let bytes = read_bytes(&mut field, MAX_IMAGE_BYTES).await?;
                // An empty file input still sends a part.
                if !(filename.is_empty() && bytes.is_empty()) {
                    form.image = Some(ImageUpload { filename, bytes });
                }
            }
            "image-clear" => {
                read_bytes(&mut field, MAX_TEXT_BYTES).await?;
                form.image_clear = true;
            }
            _ => {
                read_bytes(&mut field, MAX_IMAGE_BYTES).await?;
            }
        }
    }

    Ok(form)
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let bytes = read_bytes(field, MAX_TEXT_BYTES).await?;
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Form field is not UTF-8".into()))
}

async fn read_bytes(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Field '{}' exceeds {} bytes",
                field.name().unwrap_or_default(),
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
