//! File uploads through Shopify staged uploads.
//!
//! Every upload is three calls: `stagedUploadsCreate` for a signed target,
//! a multipart POST of the bytes to that target, then `fileCreate`.

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use crate::shopify::{
    AdminClient, AdminShopifyError, CreatedFile, StagedUploadResource, StagedUploadTarget,
};

/// Errors that can occur while uploading a file.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Request carried no file.
    #[error("No file provided")]
    MissingFile,

    /// A required form field is missing.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Image was not a base64 `data:` URL.
    #[error("Invalid data URL")]
    InvalidDataUrl,

    /// File exceeds the configured size limit.
    #[error("File is larger than {max_mb}MB")]
    TooLarge { max_mb: u64 },

    /// Extension not in the allowed list.
    #[error("File type .{0} is not allowed")]
    DisallowedType(String),

    /// Request body exceeded the proxy body limit.
    #[error("Request body is too large")]
    BodyTooLarge,

    /// Multipart body could not be read.
    #[error("Invalid upload: {0}")]
    Multipart(String),

    /// Shopify rejected one of the upload steps.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

impl UploadError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Shopify(AdminShopifyError::UserError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::TooLarge { .. } | Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Shopify(AdminShopifyError::StagedUpload { .. }) => {
                "Staged upload POST failed".to_string()
            }
            Self::Shopify(e) => e
                .first_user_error()
                .unwrap_or_else(|| "File upload to Shopify failed".to_string()),
            other => other.to_string(),
        }
    }
}

/// Bytes ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    /// Decode a `data:{mime};base64,{payload}` URL.
    ///
    /// `default_mime` is used when the URL names no type.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidDataUrl`] if the URL is not base64
    /// encoded data.
    pub fn from_data_url(
        data_url: &str,
        filename: impl Into<String>,
        default_mime: &str,
    ) -> Result<Self, UploadError> {
        let (header, payload) = data_url
            .trim()
            .split_once(',')
            .ok_or(UploadError::InvalidDataUrl)?;
        let media = header
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .ok_or(UploadError::InvalidDataUrl)?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| UploadError::InvalidDataUrl)?;

        let mime_type = if media.is_empty() { default_mime } else { media };

        Ok(Self {
            filename: filename.into(),
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercase extension of the file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.filename)
    }

    /// Reject files above `max_mb` or with an extension outside `allowed`.
    ///
    /// `jpeg` counts as `jpg`. An empty `allowed` list accepts every type.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::TooLarge`] or [`UploadError::DisallowedType`].
    pub fn check_limits(&self, max_mb: u64, allowed: &[String]) -> Result<(), UploadError> {
        if self.size() > max_mb.saturating_mul(1024 * 1024) {
            return Err(UploadError::TooLarge { max_mb });
        }

        if allowed.is_empty() {
            return Ok(());
        }
        let ext = self.extension().unwrap_or_default();
        let normalized = if ext == "jpeg" { "jpg" } else { ext.as_str() };
        if allowed
            .iter()
            .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(normalized))
        {
            Ok(())
        } else {
            Err(UploadError::DisallowedType(ext))
        }
    }
}

/// Lowercase extension after the last `.`.
#[must_use]
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Stored name of a design side upload: `{side}_{color}_{product}_{millis}.{ext}`.
#[must_use]
pub fn design_upload_filename(
    side: &str,
    color: Option<&str>,
    product_id: Option<&str>,
    original_name: &str,
) -> String {
    let color = color.map_or_else(|| "default".to_string(), sanitize_segment);
    let product = product_id.map_or_else(
        || "unknown".to_string(),
        |id| sanitize_segment(id.rsplit('/').next().unwrap_or(id)),
    );
    let ext = file_extension(original_name).unwrap_or_else(|| "png".to_string());
    format!(
        "{}_{color}_{product}_{}.{ext}",
        sanitize_segment(side),
        Utc::now().timestamp_millis()
    )
}

fn sanitize_segment(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// Stage, POST and register one file.
///
/// # Errors
///
/// Returns [`UploadError::Shopify`] if any of the three steps fails.
#[instrument(skip(client, file), fields(filename = %file.filename, size = file.bytes.len()))]
pub async fn upload_file(
    client: &AdminClient,
    file: FilePayload,
    alt: Option<&str>,
) -> Result<CreatedFile, UploadError> {
    let target = stage(client, &file.filename, &file.mime_type, file.size()).await?;
    client
        .upload_to_target(&target, &file.filename, &file.mime_type, file.bytes)
        .await?;
    let created = client.create_file(&target.original_source(), alt).await?;

    tracing::info!(file_id = %created.id, "File uploaded");
    Ok(created)
}

/// Request a staged upload target for the two-phase browser flow.
///
/// # Errors
///
/// Returns [`UploadError::Shopify`] if Shopify rejects the request.
pub async fn stage(
    client: &AdminClient,
    filename: &str,
    mime_type: &str,
    size: u64,
) -> Result<StagedUploadTarget, UploadError> {
    Ok(client
        .create_staged_upload(filename, mime_type, size, StagedUploadResource::File)
        .await?)
}
