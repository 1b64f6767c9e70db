//! Orders with attached customer designs.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use tracing::{info, instrument};

use product_configurator_core::{DesignStatus, MetaobjectGid};

use super::designs::Design;
use crate::error::AppError;
use crate::shopify::{AdminClient, AdminShopifyError, Order, OrderQuery};

/// Orders shown per page.
pub const ORDER_LIST_LIMIT: i64 = 50;

/// Overall review status of an order's designs.
///
/// All approved is approved, any rejected is rejected, anything else is
/// pending. Designs with no readable status count as pending.
#[must_use]
pub fn aggregate_design_status(statuses: &[DesignStatus]) -> DesignStatus {
    if statuses.is_empty() {
        DesignStatus::Pending
    } else if statuses.iter().all(|s| *s == DesignStatus::Approved) {
        DesignStatus::Approved
    } else if statuses.contains(&DesignStatus::Rejected) {
        DesignStatus::Rejected
    } else {
        DesignStatus::Pending
    }
}

/// Design filter for the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesignFilter {
    #[default]
    All,
    WithDesigns,
    NoDesigns,
    Status(DesignStatus),
}

impl FromStr for DesignFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "with_designs" => Ok(Self::WithDesigns),
            "no_designs" => Ok(Self::NoDesigns),
            other => other
                .parse()
                .map(Self::Status)
                .map_err(|_| format!("Unknown design filter: {other}")),
        }
    }
}

/// Design summary of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignInfo {
    pub has_designs: bool,
    pub design_count: usize,
    pub design_status: Option<DesignStatus>,
}

impl DesignInfo {
    fn new(design_ids: &[String], designs: &HashMap<String, DesignStatus>) -> Self {
        if design_ids.is_empty() {
            return Self {
                has_designs: false,
                design_count: 0,
                design_status: None,
            };
        }
        let statuses: Vec<DesignStatus> = design_ids
            .iter()
            .filter_map(|id| designs.get(id).copied())
            .collect();
        Self {
            has_designs: true,
            design_count: design_ids.len(),
            design_status: Some(aggregate_design_status(&statuses)),
        }
    }

    #[must_use]
    pub fn matches(&self, filter: DesignFilter) -> bool {
        match filter {
            DesignFilter::All => true,
            DesignFilter::WithDesigns => self.has_designs,
            DesignFilter::NoDesigns => !self.has_designs,
            DesignFilter::Status(status) => self.design_status == Some(status),
        }
    }
}

/// Order list row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub design_ids: Vec<String>,
    pub design_info: DesignInfo,
}

/// Order with its designs resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub designs: Vec<Design>,
}

/// Metaobject GIDs among `ids`; other values (draft row ids) are skipped.
fn metaobject_ids<'a>(ids: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut gids: Vec<String> = ids
        .into_iter()
        .filter(|id| id.starts_with("gid://"))
        .filter_map(|id| MetaobjectGid::parse(id).ok())
        .map(|gid| gid.as_str().to_string())
        .collect();
    gids.sort();
    gids.dedup();
    gids
}

async fn fetch_designs(client: &AdminClient, ids: &[String]) -> Result<Vec<Design>, AdminShopifyError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(client
        .get_metaobjects(ids)
        .await?
        .into_iter()
        .map(Design::from)
        .collect())
}

/// Recent orders with their design summary, filtered by `filter`.
///
/// # Errors
///
/// Returns an error if orders or designs cannot be read.
#[instrument(skip(client))]
pub async fn list_orders_with_designs(
    client: &AdminClient,
    query: &OrderQuery,
    filter: DesignFilter,
) -> Result<Vec<OrderSummary>, AppError> {
    let orders = client.list_orders(ORDER_LIST_LIMIT, query).await?;
    let per_order: Vec<(Order, Vec<String>)> = orders
        .into_iter()
        .map(|order| {
            let ids = order.design_ids();
            (order, ids)
        })
        .collect();

    let gids = metaobject_ids(per_order.iter().flat_map(|(_, ids)| ids));
    let statuses: HashMap<String, DesignStatus> = fetch_designs(client, &gids)
        .await?
        .into_iter()
        .map(|design| (design.id, design.status))
        .collect();

    Ok(per_order
        .into_iter()
        .map(|(order, design_ids)| {
            let design_info = DesignInfo::new(&design_ids, &statuses);
            OrderSummary {
                order,
                design_ids,
                design_info,
            }
        })
        .filter(|summary| summary.design_info.matches(filter))
        .collect())
}

/// One order and its designs.
///
/// # Errors
///
/// Returns `NotFound` for an unknown order or the Shopify error.
pub async fn order_detail(client: &AdminClient, id: &str) -> Result<OrderDetail, AppError> {
    let order = client
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    let designs = fetch_designs(client, &metaobject_ids(&order.design_ids())).await?;
    Ok(OrderDetail { order, designs })
}

/// Fulfill everything still open on an order and notify the customer.
///
/// # Errors
///
/// Returns `BadRequest` when nothing is left to fulfill or the Shopify error.
#[instrument(skip(client))]
pub async fn fulfill_order(client: &AdminClient, id: &str) -> Result<String, AppError> {
    let fulfillment_orders = client.get_fulfillment_order_ids(id).await?;
    if fulfillment_orders.is_empty() {
        return Err(AppError::BadRequest(
            "Order has no open fulfillment orders".to_string(),
        ));
    }
    let fulfillment_id = client.create_fulfillment(&fulfillment_orders, true).await?;
    info!(order_id = %id, fulfillment_id = %fulfillment_id, "Order fulfilled");
    Ok(fulfillment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_design_status() {
        use DesignStatus::{Approved, Pending, Rejected};
        assert_eq!(aggregate_design_status(&[Approved, Approved]), Approved);
        assert_eq!(aggregate_design_status(&[Approved, Rejected]), Rejected);
        assert_eq!(aggregate_design_status(&[Approved, Pending]), Pending);
        assert_eq!(aggregate_design_status(&[]), Pending);
    }

    #[test]
    fn test_design_filter_parse() {
        assert_eq!("".parse(), Ok(DesignFilter::All));
        assert_eq!("with_designs".parse(), Ok(DesignFilter::WithDesigns));
        assert_eq!(
            "approved".parse(),
            Ok(DesignFilter::Status(DesignStatus::Approved))
        );
        assert!("shipped".parse::<DesignFilter>().is_err());
    }

    #[test]
    fn test_design_info_matches() {
        let known: HashMap<String, DesignStatus> = [(
            "gid://shopify/Metaobject/1".to_string(),
            DesignStatus::Rejected,
        )]
        .into_iter()
        .collect();

        let with = DesignInfo::new(&["gid://shopify/Metaobject/1".to_string()], &known);
        assert!(with.matches(DesignFilter::WithDesigns));
        assert!(with.matches(DesignFilter::Status(DesignStatus::Rejected)));
        assert!(!with.matches(DesignFilter::NoDesigns));

        let without = DesignInfo::new(&[], &known);
        assert!(without.matches(DesignFilter::NoDesigns));
        assert!(!without.matches(DesignFilter::Status(DesignStatus::Pending)));
    }

    #[test]
    fn test_metaobject_ids_skip_draft_rows() {
        let ids = [
            "gid://shopify/Metaobject/2".to_string(),
            "design_1700000000000_abc".to_string(),
            "gid://shopify/Metaobject/2".to_string(),
        ];
        assert_eq!(metaobject_ids(&ids), ["gid://shopify/Metaobject/2"]);
    }
}
