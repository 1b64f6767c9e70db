//! Unified error handling for the configurator admin.
//!
//! Every handler error ends up as the JSON envelope
//! `{"success": false, "error": "..."}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use product_configurator_core::InvalidTransition;

use crate::db::RepositoryError;
use crate::services::uploads::UploadError;
use crate::shopify::AdminShopifyError;

/// Application-level error type for the configurator.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// File upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Design status change not allowed by the workflow.
    #[error("{0}")]
    Transition(#[from] InvalidTransition),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Request is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request body could not be extracted.
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Transition(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(AdminShopifyError::UserError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Shopify(AdminShopifyError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Upload(e) => e.status(),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Design not found".to_string(),
            Self::Database(RepositoryError::Conflict(message)) => message.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(AdminShopifyError::UserError(_)) => self
                .shopify_user_error()
                .unwrap_or_else(|| "Shopify rejected the request".to_string()),
            Self::Shopify(AdminShopifyError::NotFound(what)) => format!("{what} not found"),
            Self::Shopify(_) => "External service error".to_string(),
            Self::Upload(e) => e.public_message(),
            _ => self.to_string(),
        }
    }

    fn shopify_user_error(&self) -> Option<String> {
        match self {
            Self::Shopify(e) => e.first_user_error(),
            _ => None,
        }
    }
}

impl AppError {
    fn invalid_body(status: StatusCode, body_text: String) -> Self {
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::BodyTooLarge.to_string()
        } else {
            body_text
        };
        Self::InvalidBody { status, message }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_body(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::invalid_body(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Configurator request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = json!({
            "success": false,
            "error": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Tag the Sentry scope with the shop the request came from.
pub fn set_sentry_shop(shop: &str) {
    sentry::configure_scope(|scope| {
        scope.set_tag("shop", shop);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::UserError;
    use product_configurator_core::DesignStatus;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Design not found".to_string());
        assert_eq!(err.to_string(), "Design not found");

        let err = AppError::BadRequest("Design ID is required".to_string());
        assert_eq!(err.public_message(), "Design ID is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Shopify(AdminShopifyError::RateLimited(5))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_transition_is_conflict() {
        let err = AppError::from(
            DesignStatus::Completed
                .transition(DesignStatus::Pending)
                .unwrap_err(),
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.public_message(), "cannot move design from completed to pending");
    }

    #[test]
    fn test_conflict_message_is_shown() {
        let err = AppError::Database(RepositoryError::Conflict(
            "design design_1_a changed status during the update".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.public_message(),
            "design design_1_a changed status during the update"
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Internal("connection reset by peer".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_user_error_is_surfaced() {
        let err = AppError::Shopify(AdminShopifyError::UserError(vec![UserError {
            field: Some(vec!["title".to_string()]),
            message: "can't be blank".to_string(),
        }]));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.public_message(), "can't be blank");
    }

    #[test]
    fn test_oversized_body_keeps_envelope() {
        let err = AppError::invalid_body(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Failed to buffer the request body: length limit exceeded".to_string(),
        );
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.public_message(), "Request body is too large");

        let err = AppError::invalid_body(StatusCode::BAD_REQUEST, "missing field `id`".to_string());
        assert_eq!(err.public_message(), "missing field `id`");
    }
}
