//! Decoration fee lookup tables.
//!
//! The storefront adds a fee variant to the cart for each decorated line.
//! The lookup table maps a quantity tier and an ink color count to the fee
//! product variant that charges for it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::shopify::{AdminClient, AdminShopifyError, Metafield, MetafieldInput, MetafieldType, ProductVariant};

const FEES_NAMESPACE: &str = "custom";
const SCREENPRINT_KEY: &str = "fee_map_scr";
const EMBROIDERY_KEY: &str = "fee_map_emb";
const TIERS_KEY: &str = "screenprint_tiers";

const TIER_OPTION: &str = "Quantity Range";
const COLORS_OPTION: &str = "Colors";

/// Tier label to color count to variant GID.
pub type FeeMap = BTreeMap<String, BTreeMap<u32, String>>;

/// Build the lookup table from the fee product's variants.
///
/// Variants without a tier or a numeric color count are ignored. A color
/// value like `"3 colors"` counts as 3.
#[must_use]
pub fn build_fee_map(variants: &[ProductVariant]) -> FeeMap {
    let mut map = FeeMap::new();
    for variant in variants {
        let option = |name: &str| {
            variant
                .selected_options
                .iter()
                .find(|o| o.name == name)
                .map(|o| o.value.trim())
        };
        let Some(tier) = option(TIER_OPTION).filter(|t| !t.is_empty()) else {
            continue;
        };
        let Some(colors) = option(COLORS_OPTION).and_then(leading_number) else {
            continue;
        };
        map.entry(tier.to_string())
            .or_default()
            .insert(colors, variant.id.clone());
    }
    map
}

fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Fee tables as served to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeMaps {
    pub screenprint: Value,
    pub embroidery: Value,
    pub tiers: Value,
}

impl FeeMaps {
    /// Read the tables from shop metafields. Missing or malformed values
    /// become empty tables.
    #[must_use]
    pub fn from_metafields(metafields: &[Metafield]) -> Self {
        let parsed = |key: &str| {
            metafields
                .iter()
                .find(|m| m.namespace == FEES_NAMESPACE && m.key == key)
                .and_then(|m| serde_json::from_str::<Value>(&m.value).ok())
                .filter(|v| !v.is_null())
        };
        Self {
            screenprint: parsed(SCREENPRINT_KEY).unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            embroidery: parsed(EMBROIDERY_KEY).unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            tiers: parsed(TIERS_KEY).unwrap_or_else(|| Value::Array(Vec::new())),
        }
    }
}

/// Load the fee tables.
///
/// # Errors
///
/// Returns an error if the shop metafields cannot be read.
pub async fn load_fee_maps(client: &AdminClient) -> Result<FeeMaps, AppError> {
    let (_, metafields) = client.get_shop_metafields(FEES_NAMESPACE).await?;
    Ok(FeeMaps::from_metafields(&metafields))
}

/// Outcome of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRebuild {
    pub tiers: usize,
    pub variants: usize,
}

/// Rebuild the screenprint table from the fee product `handle`.
///
/// `tiers_json` is stored as the tier list; blank means `[]`.
///
/// # Errors
///
/// Returns `BadRequest` when the product does not exist or the tier list is
/// not JSON, or the Shopify error.
#[instrument(skip(client, tiers_json))]
pub async fn rebuild_screenprint_fees(
    client: &AdminClient,
    handle: &str,
    tiers_json: Option<&str>,
) -> Result<FeeRebuild, AppError> {
    let tiers = tiers_value(tiers_json)?;
    let product = client
        .get_product_by_handle(handle.trim())
        .await?
        .ok_or_else(|| AppError::BadRequest("Fee product not found".to_string()))?;

    let map = build_fee_map(&product.variants);
    let summary = FeeRebuild {
        tiers: map.len(),
        variants: map.values().map(BTreeMap::len).sum(),
    };

    let shop_id = client.shop_id().await?;
    client
        .set_metafields(vec![
            MetafieldInput::json(&shop_id, FEES_NAMESPACE, SCREENPRINT_KEY, &map)
                .map_err(AdminShopifyError::Parse)?,
            MetafieldInput::new(
                &shop_id,
                FEES_NAMESPACE,
                TIERS_KEY,
                MetafieldType::Json,
                tiers.to_string(),
            ),
        ])
        .await?;

    info!(product_id = %product.id, tiers = summary.tiers, variants = summary.variants, "Rebuilt screenprint fee map");
    Ok(summary)
}

fn tiers_value(tiers_json: Option<&str>) -> Result<Value, AppError> {
    match tiers_json.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(Value::Array(Vec::new())),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|_| AppError::BadRequest("Tiers must be valid JSON".to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::SelectedOption;

    fn variant(id: &str, options: &[(&str, &str)]) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            title: String::new(),
            price: None,
            sku: None,
            inventory_quantity: None,
            selected_options: options
                .iter()
                .map(|(name, value)| SelectedOption {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_fee_map() {
        let map = build_fee_map(&[
            variant("v1", &[("Quantity Range", "24-71"), ("Colors", "1")]),
            variant("v2", &[("Quantity Range", "24-71"), ("Colors", "2 colors")]),
            variant("v3", &[("Quantity Range", "72-299"), ("Colors", "1")]),
            variant("v4", &[("Quantity Range", "72-299"), ("Colors", "many")]),
            variant("v5", &[("Colors", "1")]),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("24-71").and_then(|c| c.get(&2)).map(String::as_str),
            Some("v2")
        );
        assert_eq!(map.get("72-299").map(BTreeMap::len), Some(1));
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({"24-71": {"1": "v1", "2": "v2"}, "72-299": {"1": "v3"}})
        );
    }

    #[test]
    fn test_fee_maps_tolerate_bad_json() {
        let metafield = |key: &str, value: &str| Metafield {
            namespace: "custom".to_string(),
            key: key.to_string(),
            value: value.to_string(),
        };
        let maps = FeeMaps::from_metafields(&[
            metafield("fee_map_scr", r#"{"24-71":{"1":"v1"}}"#),
            metafield("fee_map_emb", "{not json"),
        ]);
        assert_eq!(maps.screenprint, serde_json::json!({"24-71": {"1": "v1"}}));
        assert_eq!(maps.embroidery, serde_json::json!({}));
        assert_eq!(maps.tiers, serde_json::json!([]));
    }

    #[test]
    fn test_tiers_value() {
        assert_eq!(tiers_value(None).ok(), Some(serde_json::json!([])));
        assert_eq!(
            tiers_value(Some(r#"["24-71","72+"]"#)).ok(),
            Some(serde_json::json!(["24-71", "72+"]))
        );
        assert!(tiers_value(Some("24-71")).is_err());
    }
}
