//! Shopify webhooks.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use product_configurator_core::OrderGid;

use crate::error::AppError;
use crate::middleware::hmac::verify_webhook;
use crate::state::AppState;

const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";
const DESIGN_ID_PROPERTY: &str = "_Design ID";

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/orders/create", post(order_created))
}

/// The parts of the `orders/create` payload we read.
#[derive(Debug, Deserialize)]
pub struct OrderWebhook {
    pub id: u64,
    #[serde(default)]
    pub admin_graphql_api_id: Option<String>,
    #[serde(default)]
    pub line_items: Vec<WebhookLineItem>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookLineItem {
    #[serde(default)]
    pub properties: Vec<LineItemProperty>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemProperty {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl OrderWebhook {
    fn order_gid(&self) -> String {
        self.admin_graphql_api_id
            .clone()
            .unwrap_or_else(|| OrderGid::from_numeric(self.id).as_str().to_string())
    }

    /// Unique non-blank `_Design ID` property values in order.
    fn design_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let values = self
            .line_items
            .iter()
            .flat_map(|item| &item.properties)
            .filter(|p| p.name == DESIGN_ID_PROPERTY)
            .filter_map(|p| match &p.value {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        for value in values {
            if !value.is_empty() && !ids.contains(&value) {
                ids.push(value);
            }
        }
        ids
    }
}

#[instrument(skip_all)]
async fn order_created(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get(HMAC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_webhook(&body, signature, state.config().shopify.api_secret.expose_secret()) {
        return Err(AppError::Unauthorized("Invalid webhook signature".to_string()));
    }

    let order: OrderWebhook = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid order payload: {e}")))?;
    let design_ids = order.design_ids();
    if design_ids.is_empty() {
        return Ok(StatusCode::OK);
    }

    let order_id = order.order_gid();
    state
        .shopify()
        .set_order_design_ids(&order_id, &design_ids)
        .await?;
    tracing::info!(order_id = %order_id, count = design_ids.len(), "Linked designs to order");

    Ok(StatusCode::OK)
}
