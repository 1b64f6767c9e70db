//! File uploads from the storefront designer.

use axum::{
    Json, Router,
    http::StatusCode,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use super::ProxyJson;
use crate::error::AppError;
use crate::services::uploads::{self, design_upload_filename};
use crate::services::{FilePayload, Side, UploadError};
use crate::shopify::CreatedFile;
use crate::state::AppState;

const DEFAULT_MIME: &str = "image/png";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/designs/upload", post(upload))
        .route("/api/files/stage", post(stage))
        .route("/api/files/complete", post(complete))
}

/// Check `file` against the shop's upload limits, then upload it.
pub(super) async fn upload_checked(
    state: &AppState,
    file: FilePayload,
    alt: Option<&str>,
) -> Result<CreatedFile, AppError> {
    let settings = state.settings().load().await?;
    file.check_limits(settings.max_file_size_mb, &settings.allowed_file_types)?;
    Ok(uploads::upload_file(state.shopify(), file, alt).await?)
}

fn multipart_error(error: MultipartError) -> UploadError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::BodyTooLarge
    } else {
        UploadError::Multipart(error.to_string())
    }
}

#[derive(Debug, Default)]
struct UploadForm {
    file: Option<FilePayload>,
    original_name: String,
    side: Option<String>,
    color: Option<String>,
    product_id: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                form.original_name.clone_from(&original_name);
                form.file = Some(FilePayload {
                    filename: original_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(multipart_error)?;
            let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            match name.as_str() {
                "side" => form.side = value,
                "color" => form.color = value,
                "productId" => form.product_id = value,
                _ => {}
            }
        }
        Ok(form)
    }
}

#[derive(Debug, Serialize)]
struct UploadedFile {
    id: String,
    url: Option<String>,
    name: String,
    size: u64,
    #[serde(rename = "type")]
    mime_type: String,
}

#[instrument(skip_all)]
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let form = UploadForm::read(multipart?).await?;
    let mut file = form.file.ok_or(UploadError::MissingFile)?;
    let side = form
        .side
        .ok_or(UploadError::MissingField("Side parameter"))?
        .parse::<Side>()
        .map_err(AppError::BadRequest)?;

    // Limits apply to what the customer picked, not the stored name.
    let settings = state.settings().load().await?;
    file.check_limits(settings.max_file_size_mb, &settings.allowed_file_types)?;

    file.filename = design_upload_filename(
        side.as_str(),
        form.color.as_deref(),
        form.product_id.as_deref(),
        &form.original_name,
    );
    let size = file.size();
    let mime_type = file.mime_type.clone();
    let created = uploads::upload_file(state.shopify(), file, None).await?;

    Ok(Json(json!({
        "success": true,
        "file": UploadedFile {
            id: created.id,
            url: created.url,
            name: form.original_name,
            size,
            mime_type,
        },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRequest {
    pub filename: String,
    pub mime_type: String,
    pub file_size: u64,
}

#[instrument(skip_all, fields(filename = %request.filename))]
async fn stage(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<StageRequest>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings().load().await?;
    let max_bytes = settings.max_file_size_mb.saturating_mul(1024 * 1024);
    if request.file_size > max_bytes {
        return Err(UploadError::TooLarge {
            max_mb: settings.max_file_size_mb,
        }
        .into());
    }

    let target = uploads::stage(
        state.shopify(),
        &request.filename,
        &request.mime_type,
        request.file_size,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "target": target,
        "originalSource": target.original_source(),
    })))
}

/// A file the browser has finished posting to its staged target.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedUpload {
    pub resource_url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub files: Vec<CompletedUpload>,
}

#[instrument(skip_all, fields(count = request.files.len()))]
async fn complete(
    State(state): State<AppState>,
    ProxyJson(request): ProxyJson<CompleteRequest>,
) -> Result<Json<Value>, AppError> {
    if request.files.is_empty() {
        return Err(UploadError::MissingFile.into());
    }

    let mut created = Vec::with_capacity(request.files.len());
    for file in &request.files {
        created.push(
            state
                .shopify()
                .create_file(&file.resource_url, file.alt.as_deref())
                .await
                .map_err(UploadError::from)?,
        );
    }
    Ok(Json(json!({ "success": true, "files": created })))
}

/// Data-URL images keyed by side, as sent by the designer canvas.
#[derive(Debug, Default, Deserialize)]
pub struct SideImages {
    pub front: Option<String>,
    pub back: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl SideImages {
    pub(super) fn get(&self, side: Side) -> Option<&str> {
        match side {
            Side::Front => self.front.as_deref(),
            Side::Back => self.back.as_deref(),
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
        .map(str::trim)
        .filter(|v| !v.is_empty())
    }
}

/// Decode the image for each side that has one.
pub(super) fn side_payloads(
    images: &SideImages,
    filenames: &SideImages,
) -> Result<Vec<(Side, FilePayload)>, UploadError> {
    Side::ALL
        .into_iter()
        .filter_map(|side| images.get(side).map(|data| (side, data)))
        .map(|(side, data)| {
            let filename = filenames
                .get(side)
                .map_or_else(|| format!("{}.png", side.as_str()), ToString::to_string);
            FilePayload::from_data_url(data, filename, DEFAULT_MIME).map(|file| (side, file))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_side_payloads() {
        let images = SideImages {
            front: Some("data:image/png;base64,aGVsbG8=".to_string()),
            back: Some("   ".to_string()),
            left: None,
            right: Some("data:;base64,aGk=".to_string()),
        };
        let filenames = SideImages {
            right: Some("logo.png".to_string()),
            ..SideImages::default()
        };
        let payloads = side_payloads(&images, &filenames).unwrap();
        let names: Vec<(Side, &str)> = payloads
            .iter()
            .map(|(side, file)| (*side, file.filename.as_str()))
            .collect();
        assert_eq!(names, [(Side::Front, "front.png"), (Side::Right, "logo.png")]);
    }

    #[test]
    fn test_side_payloads_rejects_bad_data() {
        let images = SideImages {
            front: Some("not a data url".to_string()),
            ..SideImages::default()
        };
        assert!(matches!(
            side_payloads(&images, &SideImages::default()),
            Err(UploadError::InvalidDataUrl)
        ));
    }

    #[test]
    fn test_complete_request_defaults() {
        let request: CompleteRequest =
            serde_json::from_value(json!({})).unwrap();
        assert!(request.files.is_empty());

        let request: CompleteRequest = serde_json::from_value(json!({
            "files": [{ "resourceUrl": "https://storage/tmp/1" }]
        }))
        .unwrap();
        assert_eq!(request.files.first().map(|f| f.resource_url.as_str()), Some("https://storage/tmp/1"));
    }
}
