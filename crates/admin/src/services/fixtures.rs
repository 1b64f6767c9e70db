//! Sample data served when `FIXTURE_MODE=true`.
//!
//! Lets the storefront widgets be developed against a shop without
//! configured products. Never used unless fixture mode is on.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::shopify::{ProductVariant, SelectedOption};

/// A decoration method offered on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecorationOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl DecorationOption {
    /// Option for a decoration name, with the shop copy for known methods.
    #[must_use]
    pub fn named(name: &str) -> Self {
        let name = name.trim();
        let id = name.to_lowercase().replace(' ', "-");
        let description = match id.as_str() {
            "screenprint" | "screen-print" => {
                "Your design is applied directly onto the products' surface by pushing ink through a fine mesh screen. This is one of our most popular decoration methods."
            }
            "embroidery" => {
                "Your design is stitched with thread for a premium, durable finish that's ideal for hats, polos, and thicker fabrics."
            }
            _ => "",
        };
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Sample sizes.
pub const SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "2XL", "3XL"];

/// Sample decoration methods.
#[must_use]
pub fn decorations() -> Vec<DecorationOption> {
    ["Screenprint", "Embroidery"]
        .into_iter()
        .map(DecorationOption::named)
        .collect()
}

fn variant(id: u32, size: &str, price: &str, quantity: i64) -> ProductVariant {
    ProductVariant {
        id: format!("gid://shopify/ProductVariant/{id}"),
        title: format!("{size} / Default"),
        price: Some(price.to_string()),
        sku: Some(format!("PROD-{}-DEFAULT", size.to_uppercase())),
        inventory_quantity: Some(quantity),
        selected_options: vec![
            SelectedOption {
                name: "Size".to_string(),
                value: size.to_string(),
            },
            SelectedOption {
                name: "Color".to_string(),
                value: "Default".to_string(),
            },
        ],
    }
}

/// Sample variants.
#[must_use]
pub fn variants() -> Vec<ProductVariant> {
    vec![
        variant(1, "Small", "15.99", 100),
        variant(2, "Medium", "17.99", 75),
        variant(3, "Large", "19.99", 50),
    ]
}

/// Sample product detail for `product_id`, shaped like the variants endpoint.
#[must_use]
pub fn product(product_id: &str) -> serde_json::Value {
    let colors = ["Red", "Blue", "Black", "White"];
    let sizes = ["Small", "Medium", "Large", "XL"];
    let decorations = ["Screen Print", "Embroidery", "Heat Transfer"];
    let metafields: BTreeMap<&str, serde_json::Value> = [
        ("product_configurator.colors", json!(colors)),
        ("product_configurator.sizes", json!(sizes)),
        ("product_configurator.decorations", json!(decorations)),
        ("product_configurator.base_price", json!("15.99")),
    ]
    .into_iter()
    .collect();

    json!({
        "id": product_id,
        "title": "Sample Product",
        "handle": "sample-product",
        "options": {
            "size": sizes,
            "color": colors,
            "decoration": decorations,
        },
        "metafields": metafields,
    })
}

/// Sample saved designs.
#[must_use]
pub fn customer_designs() -> serde_json::Value {
    json!([
        {
            "id": "design-1",
            "designName": "Summer T-Shirt Design",
            "productId": "gid://shopify/Product/12345",
            "productTitle": "Classic Cotton T-Shirt",
            "decorationType": "Screen Print",
            "status": "approved",
            "createdAt": "2023-06-15T10:30:00Z",
            "updatedAt": "2023-06-16T14:45:00Z"
        },
        {
            "id": "design-2",
            "designName": "Logo Embroidery",
            "productId": "gid://shopify/Product/12346",
            "productTitle": "Premium Polo Shirt",
            "decorationType": "Embroidery",
            "status": "pending",
            "createdAt": "2023-06-18T09:15:00Z",
            "updatedAt": "2023-06-18T09:15:00Z"
        }
    ])
}
