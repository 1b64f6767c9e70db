//! Order domain types for Shopify Admin API.

use serde::{Deserialize, Serialize};

use super::common::{MoneyBag, Nodes};

/// Line item property that carries a customer design id.
pub const DESIGN_ID_PROPERTY: &str = "_Design ID";

/// Key/value pair attached to a line item at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub quantity: i64,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default)]
    pub custom_attributes: Vec<Attribute>,
}

impl OrderLineItem {
    /// Value of the `_Design ID` property, if any.
    #[must_use]
    pub fn design_id(&self) -> Option<&str> {
        self.custom_attributes
            .iter()
            .find(|a| a.key == DESIGN_ID_PROPERTY)
            .and_then(|a| a.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Customer attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// Bare metafield value as selected by `metafield(namespace:, key:)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldValue {
    pub value: String,
}

/// Order as returned by the order queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub display_fulfillment_status: Option<String>,
    #[serde(default)]
    pub display_financial_status: Option<String>,
    #[serde(default)]
    pub total_price_set: Option<MoneyBag>,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub line_items: Nodes<OrderLineItem>,
    /// `custom.design_ids` metafield.
    #[serde(default, rename = "metafield")]
    pub design_ids_metafield: Option<MetafieldValue>,
}

impl Order {
    /// Design ids linked to the order.
    ///
    /// Reads the `custom.design_ids` list metafield and falls back to the
    /// line item properties when the metafield is missing or unreadable.
    #[must_use]
    pub fn design_ids(&self) -> Vec<String> {
        let from_metafield = self
            .design_ids_metafield
            .as_ref()
            .and_then(|m| serde_json::from_str::<Vec<String>>(&m.value).ok())
            .filter(|ids| !ids.is_empty());
        from_metafield.unwrap_or_else(|| design_ids_from_line_items(&self.line_items.nodes))
    }
}

/// Unique `_Design ID` values across line items, in order of appearance.
#[must_use]
pub fn design_ids_from_line_items(items: &[OrderLineItem]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in items.iter().filter_map(OrderLineItem::design_id) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Open fulfillment order on an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentOrder {
    pub id: String,
    pub status: String,
}
