//! Staged uploads and file records for the Admin API.

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, check_user_errors, missing,
    queries::{self, FileCreate, StagedUploadsCreate},
};
use crate::shopify::types::{CreatedFile, StagedUploadResource, StagedUploadTarget};

impl AdminClient {
    /// Create a staged upload target for one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn create_staged_upload(
        &self,
        filename: &str,
        mime_type: &str,
        file_size: u64,
        resource: StagedUploadResource,
    ) -> Result<StagedUploadTarget, AdminShopifyError> {
        use queries::staged_uploads_create::{StagedUploadInput, Variables};

        let variables = Variables {
            input: vec![StagedUploadInput {
                filename: filename.to_string(),
                mime_type: mime_type.to_string(),
                resource,
                file_size: file_size.to_string(),
                http_method: "POST",
            }],
        };

        let response = self.execute::<StagedUploadsCreate>(variables).await?;
        let payload = response
            .staged_uploads_create
            .ok_or_else(|| missing("Staged upload creation failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .staged_targets
            .and_then(|targets| targets.into_iter().next())
            .ok_or_else(|| missing("Staged upload creation failed"))
    }

    /// POST file bytes to a staged target as multipart form data.
    ///
    /// The target's parameters go first, the file last.
    ///
    /// # Errors
    ///
    /// Returns [`AdminShopifyError::StagedUpload`] if the storage host rejects
    /// the upload.
    #[instrument(skip(self, target, bytes), fields(size = bytes.len()))]
    pub async fn upload_to_target(
        &self,
        target: &StagedUploadTarget,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AdminShopifyError> {
        let mut form = Form::new();
        for parameter in &target.parameters {
            form = form.text(parameter.name.clone(), parameter.value.clone());
        }
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;
        form = form.part("file", part);

        let response = self.http().post(&target.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminShopifyError::StagedUpload {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Register an uploaded file with Shopify.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn create_file(
        &self,
        original_source: &str,
        alt: Option<&str>,
    ) -> Result<CreatedFile, AdminShopifyError> {
        use queries::file_create::{FileCreateInput, Variables};

        let variables = Variables {
            files: vec![FileCreateInput {
                original_source: original_source.to_string(),
                content_type: "FILE",
                alt: alt.map(String::from),
            }],
        };

        let response = self.execute::<FileCreate>(variables).await?;
        let payload = response
            .file_create
            .ok_or_else(|| missing("File creation failed"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .files
            .and_then(|files| files.into_iter().next())
            .map(|file| CreatedFile {
                id: file.id,
                url: file.url.or_else(|| file.image.map(|image| image.url)),
            })
            .ok_or_else(|| missing("File creation failed"))
    }
}
