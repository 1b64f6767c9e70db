//! Order and fulfillment operations for the Admin API.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, check_user_errors, missing,
    queries::{self, FulfillmentCreate, GetFulfillmentOrders, GetOrder, GetOrders},
};
use crate::shopify::types::{MetafieldInput, MetafieldType, Order};

/// Filters for the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Shopify fulfillment status (e.g. `unfulfilled`).
    pub fulfillment_status: Option<String>,
    /// Free text matched against order name and email.
    pub search: Option<String>,
}

impl OrderQuery {
    /// Shopify search syntax for this filter, if any.
    #[must_use]
    pub fn to_search_query(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(status) = self.fulfillment_status.as_deref().map(str::trim)
            && !status.is_empty()
        {
            parts.push(format!("fulfillment_status:{status}"));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            parts.push(format!("(name:*{search}* OR email:*{search}*)"));
        }
        (!parts.is_empty()).then(|| parts.join(" AND "))
    }
}

impl AdminClient {
    /// Most recent orders with their design id metafield.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        first: i64,
        filter: &OrderQuery,
    ) -> Result<Vec<Order>, AdminShopifyError> {
        let variables = queries::get_orders::Variables {
            first,
            query: filter.to_search_query(),
        };
        let response = self.execute::<GetOrders>(variables).await?;
        Ok(response.orders.nodes)
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, AdminShopifyError> {
        let variables = queries::get_order::Variables { id: id.to_string() };
        let response = self.execute::<GetOrder>(variables).await?;
        Ok(response.order)
    }

    /// Ids of the order's fulfillment orders that can still be fulfilled.
    ///
    /// # Errors
    ///
    /// Returns [`AdminShopifyError::NotFound`] if the order does not exist.
    #[instrument(skip(self))]
    pub async fn get_fulfillment_order_ids(
        &self,
        order_id: &str,
    ) -> Result<Vec<String>, AdminShopifyError> {
        let variables = queries::get_fulfillment_orders::Variables {
            id: order_id.to_string(),
        };
        let response = self.execute::<GetFulfillmentOrders>(variables).await?;
        let order = response
            .order
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Order {order_id}")))?;

        Ok(order
            .fulfillment_orders
            .nodes
            .into_iter()
            .filter(|fo| matches!(fo.status.as_str(), "OPEN" | "IN_PROGRESS"))
            .map(|fo| fo.id)
            .collect())
    }

    /// Fulfill every line item of the given fulfillment orders.
    ///
    /// Returns the new fulfillment's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn create_fulfillment(
        &self,
        fulfillment_order_ids: &[String],
        notify_customer: bool,
    ) -> Result<String, AdminShopifyError> {
        use queries::fulfillment_create::{FulfillmentInput, FulfillmentOrderLineItems, Variables};

        let variables = Variables {
            fulfillment: FulfillmentInput {
                line_items_by_fulfillment_order: fulfillment_order_ids
                    .iter()
                    .map(|id| FulfillmentOrderLineItems {
                        fulfillment_order_id: id.clone(),
                    })
                    .collect(),
                notify_customer,
            },
        };
        let response = self.execute::<FulfillmentCreate>(variables).await?;
        let payload = response
            .fulfillment_create
            .ok_or_else(|| missing("Failed to create fulfillment"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .fulfillment
            .map(|f| f.id)
            .ok_or_else(|| missing("Failed to create fulfillment"))
    }

    /// Store the design ids of an order in `custom.design_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, design_ids), fields(count = design_ids.len()))]
    pub async fn set_order_design_ids(
        &self,
        order_id: &str,
        design_ids: &[String],
    ) -> Result<(), AdminShopifyError> {
        let input = MetafieldInput::new(
            order_id,
            "custom",
            "design_ids",
            MetafieldType::SingleLineTextList,
            serde_json::to_string(design_ids)?,
        );
        self.set_metafields(vec![input]).await.map(|_| ())
    }
}
