//! Product domain types for Shopify Admin API.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use product_configurator_core::{Axis, OptionSet, VariantSignature};

use super::common::Image;
use super::metafield::Metafield;

/// Namespace holding the wizard's configuration snapshot.
pub const CONFIGURATOR_NAMESPACE: &str = "product_configurator";
/// Older namespace some themes write option lists to.
pub const LEGACY_NAMESPACE: &str = "custom";

// =============================================================================
// Product Types
// =============================================================================

/// Product status in the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Product is visible on the storefront.
    Active,
    /// Product is not visible (work in progress).
    Draft,
    /// Product is hidden/archived.
    Archived,
    /// Product is unlisted (not shown in search/collections but accessible via URL).
    Unlisted,
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DRAFT" => Ok(Self::Draft),
            "ARCHIVED" => Ok(Self::Archived),
            "UNLISTED" => Ok(Self::Unlisted),
            other => Err(format!("unknown product status: {other}")),
        }
    }
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    Title,
    CreatedAt,
    UpdatedAt,
}

/// Row of a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: ProductStatus,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// A product option and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Option name and value picked by a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl ProductVariant {
    /// Duplicate-detection signature from the variant's selected option values.
    #[must_use]
    pub fn signature(&self) -> VariantSignature {
        VariantSignature::from_values(self.selected_options.iter().map(|o| o.value.as_str()))
    }
}

/// What the wizard needs to know about a product before configuring it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductConfiguration {
    pub id: String,
    pub title: String,
    pub options: Vec<ProductOption>,
    /// First 250 variants.
    pub variants: Vec<ProductVariant>,
    /// Configurator metafields that are set on the product.
    pub metafields: Vec<Metafield>,
}

impl ProductConfiguration {
    /// Signatures of every existing variant.
    #[must_use]
    pub fn existing_signatures(&self) -> HashSet<VariantSignature> {
        self.variants.iter().map(ProductVariant::signature).collect()
    }

    /// Whether the product already has an option called `name` (exact match).
    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    /// Option lists stored by a previous wizard run.
    ///
    /// Reads `product_configurator.*` and falls back to `custom.*` per axis.
    #[must_use]
    pub fn stored_options(&self) -> OptionSet {
        let lookup = |key: &str| -> Vec<String> {
            [CONFIGURATOR_NAMESPACE, LEGACY_NAMESPACE]
                .iter()
                .find_map(|namespace| {
                    self.metafields
                        .iter()
                        .find(|m| m.namespace == *namespace && m.key == key)
                        .and_then(|m| serde_json::from_str::<Vec<String>>(&m.value).ok())
                })
                .unwrap_or_default()
        };
        OptionSet::new(lookup("colors"), lookup("sizes"), lookup("decorations"))
    }

    /// Base price stored by a previous wizard run.
    #[must_use]
    pub fn stored_base_price(&self) -> Option<&str> {
        self.metafields
            .iter()
            .find(|m| m.namespace == CONFIGURATOR_NAMESPACE && m.key == "base_price")
            .map(|m| m.value.as_str())
    }
}

/// Product detail view with options keyed by lowercase name and metafields
/// keyed by `namespace.key` (JSON values parsed when possible).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub description: String,
    pub product_type: String,
    pub vendor: String,
    pub tags: Vec<String>,
    pub options: BTreeMap<String, Vec<String>>,
    pub metafields: BTreeMap<String, serde_json::Value>,
    pub images: Vec<Image>,
    pub variants: Vec<ProductVariant>,
}

/// Product with its variants, as used by the fee map builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithVariants {
    pub id: String,
    pub title: String,
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// A product option to create, with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInput {
    pub name: String,
    pub values: Vec<String>,
}

impl OptionInput {
    /// Option for one wizard axis.
    #[must_use]
    pub fn for_axis(axis: Axis, values: &[String]) -> Self {
        Self {
            name: axis.option_name().to_string(),
            values: values.to_vec(),
        }
    }
}

/// A new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub product_type: String,
    pub vendor: String,
    pub status: ProductStatus,
    pub description_html: String,
    pub options: Vec<OptionInput>,
    /// Leave unset to let Shopify derive the handle from the title.
    pub handle: Option<String>,
    pub tags: Vec<String>,
}

/// Changes to an existing product. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub id: String,
    pub title: Option<String>,
    pub description_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<ProductStatus>,
    /// Replaces every tag when set.
    pub tags: Option<Vec<String>>,
}

/// Inventory behaviour when a variant is out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryPolicy {
    Deny,
    Continue,
}

/// A variant to create through `productVariantsBulkCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInput {
    /// `(option name, value)` pairs.
    pub option_values: Vec<(String, String)>,
    pub price: String,
    pub inventory_policy: InventoryPolicy,
    pub sku: Option<String>,
}

/// Product returned by `productCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    pub id: String,
    pub title: String,
    pub handle: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_from_form_value() {
        assert_eq!("active".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert_eq!(" DRAFT ".parse::<ProductStatus>(), Ok(ProductStatus::Draft));
        assert!("published".parse::<ProductStatus>().is_err());
    }

    fn variant(values: &[&str]) -> ProductVariant {
        ProductVariant {
            id: "gid://shopify/ProductVariant/1".to_string(),
            title: values.join(" / "),
            price: None,
            sku: None,
            inventory_quantity: None,
            selected_options: values
                .iter()
                .map(|v| SelectedOption {
                    name: "Option".to_string(),
                    value: (*v).to_string(),
                })
                .collect(),
        }
    }

    fn metafield(namespace: &str, key: &str, value: &str) -> Metafield {
        Metafield {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_variant_signature_ignores_case_and_order() {
        assert_eq!(
            variant(&["M", " Red "]).signature(),
            variant(&["red", "m"]).signature()
        );
    }

    #[test]
    fn test_stored_options_prefers_configurator_namespace() {
        let config = ProductConfiguration {
            metafields: vec![
                metafield("custom", "colors", r#"["Green"]"#),
                metafield("product_configurator", "colors", r#"["Red","Blue"]"#),
                metafield("custom", "sizes", r#"["S"]"#),
                metafield("product_configurator", "decorations", "not json"),
            ],
            ..ProductConfiguration::default()
        };
        let options = config.stored_options();
        assert_eq!(options.colors, ["Red", "Blue"]);
        assert_eq!(options.sizes, ["S"]);
        assert!(options.decorations.is_empty());
    }

    #[test]
    fn test_has_option_is_exact() {
        let config = ProductConfiguration {
            options: vec![ProductOption {
                id: None,
                name: "Color".to_string(),
                values: vec!["Red".to_string()],
            }],
            ..ProductConfiguration::default()
        };
        assert!(config.has_option("Color"));
        assert!(!config.has_option("color"));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ProductStatus::Draft).unwrap();
        assert_eq!(json, "\"DRAFT\"");
    }
}
