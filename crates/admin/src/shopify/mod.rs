//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! This module holds the Admin API access token, which can read and write
//! products, orders, files and shop metafields.
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` (see `admin::queries`)
//! - Direct API calls to Shopify (no local copy of catalog data)
//! - Mutation `userErrors` become [`AdminShopifyError::UserError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use product_configurator_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//! let products = client.list_products(100, None, Some(ProductSortKey::Title)).await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, OrderQuery};
pub use types::*;

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Mutation rejected its input.
    #[error("User error: {}", format_user_errors(.0))]
    UserError(Vec<UserError>),

    /// Uploading bytes to a staged target failed.
    #[error("Staged upload failed with status {status}: {body}")]
    StagedUpload { status: u16, body: String },
}

impl AdminShopifyError {
    /// Message of the first user error of a rejected mutation, as Shopify wrote it.
    #[must_use]
    pub fn first_user_error(&self) -> Option<String> {
        match self {
            Self::UserError(errors) => errors.first().map(|e| e.message.clone()),
            _ => None,
        }
    }

    /// Whether the failure happened talking to Shopify rather than in our input.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::GraphQL(_)
                | Self::Parse(_)
                | Self::RateLimited(_)
                | Self::StagedUpload { .. }
        )
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// Entry of a mutation's `userErrors` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if any.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field.as_deref() {
            Some(field) if !field.is_empty() => write!(f, "{}: {}", field.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_error(field: Option<&[&str]>, message: &str) -> UserError {
        UserError {
            field: field.map(|f| f.iter().map(|s| (*s).to_string()).collect()),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_admin_shopify_error_display() {
        let err = AdminShopifyError::NotFound("design".to_string());
        assert_eq!(err.to_string(), "Not found: design");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = AdminShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: Field not found; Invalid ID");
        assert!(err.is_transport());
    }

    #[test]
    fn test_user_error_formatting() {
        let err = AdminShopifyError::UserError(vec![
            user_error(Some(&["variants", "0", "price"]), "Price must be positive"),
            user_error(None, "Something else"),
        ]);
        assert_eq!(
            err.to_string(),
            "User error: variants.0.price: Price must be positive; Something else"
        );
        assert_eq!(
            err.first_user_error().as_deref(),
            Some("Price must be positive")
        );
        assert!(!err.is_transport());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = AdminShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
