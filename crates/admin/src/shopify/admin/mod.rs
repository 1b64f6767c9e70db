//! Shopify Admin API GraphQL client.
//!
//! Authenticates with the app's Admin API access token and exposes one
//! method per operation the configurator needs, grouped by resource in the
//! submodules.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};

use crate::config::ShopifyConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation, UserError};

mod files;
mod metafields;
mod metaobjects;
mod orders;
mod products;
pub mod queries;

pub use orders::OrderQuery;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; all clones share one HTTP connection pool.
///
/// # Security
///
/// This client holds the Admin API access token which has write access
/// to products, files, metaobjects and orders.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    api_version: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                store: config.store.clone(),
                api_version: config.api_version.clone(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Underlying HTTP client, shared with staged uploads.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.inner.store, self.inner.api_version
        )
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(self.endpoint())
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;
        into_data(graphql_response)
    }
}

/// Split a GraphQL response into its data or an error.
fn into_data<T>(response: GraphQLResponse<T>) -> Result<T, AdminShopifyError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                locations: e
                    .locations
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: l.line,
                        column: l.column,
                    })
                    .collect(),
                path: e.path,
            })
            .collect();
        return Err(AdminShopifyError::GraphQL(converted_errors));
    }

    response.data.ok_or_else(|| missing("No data in response"))
}

/// Fail a mutation whose payload carries `userErrors`.
fn check_user_errors(errors: Vec<UserError>) -> Result<(), AdminShopifyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdminShopifyError::UserError(errors))
    }
}

/// GraphQL error for a payload that came back empty.
fn missing(message: &str) -> AdminShopifyError {
    AdminShopifyError::GraphQL(vec![GraphQLError {
        message: message.to_string(),
        locations: vec![],
        path: vec![],
    }])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse<T: DeserializeOwned>(json: serde_json::Value) -> GraphQLResponse<T> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_into_data_returns_errors() {
        let response: GraphQLResponse<serde_json::Value> = parse(serde_json::json!({
            "data": null,
            "errors": [{"message": "Throttled", "locations": [{"line": 1, "column": 2}]}]
        }));
        match into_data(response) {
            Err(AdminShopifyError::GraphQL(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors.first().map(|e| e.message.as_str()), Some("Throttled"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_into_data_without_data() {
        let response: GraphQLResponse<serde_json::Value> = parse(serde_json::json!({}));
        let err = into_data(response).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("GraphQL errors: No data in response"));
    }

    #[test]
    fn test_check_user_errors() {
        assert!(check_user_errors(Vec::new()).is_ok());
        let err = check_user_errors(vec![UserError {
            field: Some(vec!["title".to_string()]),
            message: "can't be blank".to_string(),
        }]);
        assert!(matches!(err, Err(AdminShopifyError::UserError(_))));
    }

    #[test]
    fn test_endpoint_uses_store_and_version() {
        let client = AdminClient::new(&crate::config::tests::test_shopify());
        assert_eq!(client.store(), "test-shop.myshopify.com");
        assert_eq!(
            client.endpoint(),
            "https://test-shop.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }
}
