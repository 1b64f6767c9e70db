//! Orders carrying customer designs.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use product_configurator_core::OrderGid;

use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::services::orders::{DesignFilter, fulfill_order, list_orders_with_designs, order_detail};
use crate::shopify::OrderQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app/api/orders", get(list))
        .route("/app/api/orders/{id}", get(show))
        .route("/app/api/orders/{id}/fulfill", post(fulfill))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// `all`, `with_designs`, `no_designs` or a design status.
    pub filter: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl OrderListQuery {
    fn design_filter(&self) -> Result<DesignFilter, AppError> {
        self.filter
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(AppError::BadRequest)
    }
}

fn order_gid(id: &str) -> Result<OrderGid, AppError> {
    OrderGid::parse(id).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[instrument(skip(state, _shop))]
async fn list(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query.design_filter()?;
    let order_query = OrderQuery {
        fulfillment_status: query.status.clone(),
        search: query.search.clone(),
    };
    let orders = list_orders_with_designs(state.shopify(), &order_query, filter).await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

#[instrument(skip(state, _shop))]
async fn show(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let gid = order_gid(&id)?;
    let detail = order_detail(state.shopify(), gid.as_str()).await?;
    Ok(Json(json!({
        "success": true,
        "order": detail.order,
        "designs": detail.designs,
    })))
}

#[instrument(skip(state, _shop))]
async fn fulfill(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let gid = order_gid(&id)?;
    let fulfillment_id = fulfill_order(state.shopify(), gid.as_str()).await?;
    Ok(Json(json!({ "success": true, "fulfillmentId": fulfillment_id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_configurator_core::DesignStatus;

    #[test]
    fn test_design_filter_from_query() {
        let query = OrderListQuery::default();
        assert!(matches!(query.design_filter(), Ok(DesignFilter::All)));

        let query = OrderListQuery {
            filter: Some("rejected".to_string()),
            ..OrderListQuery::default()
        };
        assert!(matches!(
            query.design_filter(),
            Ok(DesignFilter::Status(DesignStatus::Rejected))
        ));

        let query = OrderListQuery {
            filter: Some("bogus".to_string()),
            ..OrderListQuery::default()
        };
        assert!(matches!(query.design_filter(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_order_gid_accepts_numeric() {
        assert_eq!(
            order_gid("1001").map(|g| g.as_str().to_string()).ok().as_deref(),
            Some("gid://shopify/Order/1001")
        );
    }
}
