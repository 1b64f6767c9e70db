//! Product lookups for the embedded admin.
//!
//! In fixture mode the variants, sizes and decorations endpoints answer
//! with sample data instead of calling Shopify. Creating and editing a
//! product always goes to Shopify.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use product_configurator_core::{Axis, Price, ProductGid};

use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::services::fixtures::{self, DecorationOption};
use crate::shopify::{
    InventoryPolicy, NewProduct, ProductChanges, ProductConfiguration, ProductSortKey,
    ProductStatus, VariantInput,
};
use crate::state::AppState;

/// Option Shopify gives a product created without options.
const DEFAULT_OPTION: (&str, &str) = ("Title", "Default Title");

const PRODUCT_LIST_LIMIT: i64 = 100;
const SEARCH_LIMIT: i64 = 20;
const MIN_SEARCH_LEN: usize = 2;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app/api/products", get(list))
        .route("/app/api/products/search", get(search))
        .route("/app/api/products/details", get(details))
        .route("/app/api/products/variants", get(variants))
        .route("/app/api/products/sizes", get(sizes))
        .route("/app/api/products/decorations", get(decorations))
        .route("/app/api/products/create", post(create_product))
        .route("/app/api/products/update", post(update_product))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
}

impl ProductQuery {
    fn product_id(&self) -> Result<ProductGid, AppError> {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("Product ID is required".to_string()))?;
        ProductGid::parse(id).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

#[instrument(skip(state, _shop))]
async fn list(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let products = state
        .shopify()
        .list_products(PRODUCT_LIST_LIMIT, None, Some(ProductSortKey::Title))
        .await?;
    Ok(Json(json!({ "success": true, "products": products })))
}

/// Shopify search query for a title fragment, or `None` when too short.
fn title_search(q: &str) -> Option<String> {
    let q = q.trim();
    (q.chars().count() >= MIN_SEARCH_LEN).then(|| format!("title:*{q}*"))
}

#[instrument(skip(state, _shop))]
async fn search(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let Some(search) = title_search(&query.q) else {
        return Ok(Json(json!({ "success": true, "items": [] })));
    };
    let items = state
        .shopify()
        .list_products(SEARCH_LIMIT, Some(search), None)
        .await?;
    Ok(Json(json!({ "success": true, "items": items })))
}

#[instrument(skip(state, _shop))]
async fn details(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>, AppError> {
    let id = query.product_id()?;
    let product = state
        .shopify()
        .get_product_details(id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(json!({ "success": true, "product": product })))
}

async fn configuration(state: &AppState, id: &ProductGid) -> Result<ProductConfiguration, AppError> {
    state
        .shopify()
        .get_product_configuration(id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Values of the product's option for `axis`, falling back to the stored
/// configuration when the product has no such option.
fn axis_values(config: &ProductConfiguration, axis: Axis) -> Vec<String> {
    config
        .options
        .iter()
        .find(|o| Axis::from_option_name(&o.name) == Some(axis))
        .map(|o| o.values.clone())
        .unwrap_or_else(|| config.stored_options().values(axis).to_vec())
}

#[instrument(skip(state, _shop))]
async fn variants(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>, AppError> {
    let id = query.product_id()?;
    if state.fixture_mode() {
        return Ok(Json(json!({
            "success": true,
            "variants": fixtures::variants(),
            "product": fixtures::product(id.as_str()),
        })));
    }

    let config = configuration(&state, &id).await?;
    Ok(Json(json!({
        "success": true,
        "variants": config.variants,
        "product": {
            "id": config.id,
            "title": config.title,
            "options": config.options,
        },
    })))
}

#[instrument(skip(state, _shop))]
async fn sizes(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>, AppError> {
    let id = query.product_id()?;
    let sizes = if state.fixture_mode() {
        fixtures::SIZES.iter().map(ToString::to_string).collect()
    } else {
        axis_values(&configuration(&state, &id).await?, Axis::Size)
    };
    Ok(Json(json!({ "success": true, "sizes": sizes })))
}

#[instrument(skip(state, _shop))]
async fn decorations(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>, AppError> {
    let id = query.product_id()?;
    let decorations: Vec<DecorationOption> = if state.fixture_mode() {
        fixtures::decorations()
    } else {
        axis_values(&configuration(&state, &id).await?, Axis::Decoration)
            .iter()
            .map(|name| DecorationOption::named(name))
            .collect()
    };
    Ok(Json(json!({ "success": true, "decorations": decorations })))
}

/// Product fields posted by the create and edit forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub handle: Option<String>,
    pub status: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
    pub price: Option<String>,
    pub sku: Option<String>,
}

fn filled(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl ProductForm {
    fn tags(&self) -> Option<Vec<String>> {
        self.tags.as_deref().map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(ToString::to_string)
                .collect()
        })
    }

    fn status(&self) -> Result<Option<ProductStatus>, AppError> {
        filled(self.status.as_ref())
            .map(|status| status.parse().map_err(AppError::BadRequest))
            .transpose()
    }

    fn new_product(&self) -> Result<NewProduct, AppError> {
        let title = filled(self.title.as_ref())
            .ok_or_else(|| AppError::BadRequest("Product title is required".to_string()))?;
        Ok(NewProduct {
            title,
            product_type: filled(self.product_type.as_ref()).unwrap_or_default(),
            vendor: filled(self.vendor.as_ref()).unwrap_or_default(),
            status: self.status()?.unwrap_or(ProductStatus::Draft),
            description_html: self.description.clone().unwrap_or_default(),
            options: Vec::new(),
            handle: filled(self.handle.as_ref()),
            tags: self.tags().unwrap_or_default(),
        })
    }

    /// The single variant a product created here starts with.
    fn default_variant(&self) -> VariantInput {
        VariantInput {
            option_values: vec![(DEFAULT_OPTION.0.to_string(), DEFAULT_OPTION.1.to_string())],
            price: Price::parse_or_zero(self.price.as_deref()).to_string(),
            inventory_policy: InventoryPolicy::Deny,
            sku: filled(self.sku.as_ref()),
        }
    }

    fn changes(&self) -> Result<ProductChanges, AppError> {
        let id = ProductQuery { id: self.id.clone() }.product_id()?;
        Ok(ProductChanges {
            id: id.as_str().to_string(),
            title: filled(self.title.as_ref()),
            description_html: self.description.clone(),
            vendor: self.vendor.as_deref().map(|v| v.trim().to_string()),
            product_type: self.product_type.as_deref().map(|v| v.trim().to_string()),
            status: self.status()?,
            tags: self.tags(),
        })
    }
}

/// Create a standalone product with one default variant.
#[instrument(skip(state, _shop, form))]
async fn create_product(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Value>, AppError> {
    let product = form.new_product()?;
    let created = state.shopify().create_product(&product).await?;

    // The product exists at this point; a failed variant edit leaves
    // Shopify's default variant in place.
    if let Err(e) = state
        .shopify()
        .replace_default_variant(&created.id, &form.default_variant())
        .await
    {
        warn!(product_id = %created.id, error = %e, "Failed to set default variant");
    }

    Ok(Json(json!({
        "success": true,
        "product": created,
        "message": "Product created successfully!",
    })))
}

#[instrument(skip(state, _shop, form))]
async fn update_product(
    RequireShop(_shop): RequireShop,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Value>, AppError> {
    let changes = form.changes()?;
    let product = state.shopify().update_product(&changes).await?;
    Ok(Json(json!({
        "success": true,
        "product": product,
        "message": "Product updated successfully!",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::{Metafield, ProductOption};

    #[test]
    fn test_title_search() {
        assert_eq!(title_search(" tee "), Some("title:*tee*".to_string()));
        assert_eq!(title_search("t"), None);
        assert_eq!(title_search("   "), None);
    }

    #[test]
    fn test_product_id_required() {
        let query = ProductQuery { id: Some("  ".to_string()) };
        assert!(matches!(query.product_id(), Err(AppError::BadRequest(m)) if m == "Product ID is required"));

        let query = ProductQuery { id: Some("42".to_string()) };
        assert_eq!(
            query.product_id().map(|id| id.as_str().to_string()).ok().as_deref(),
            Some("gid://shopify/Product/42")
        );
    }

    #[test]
    fn test_new_product_requires_title() {
        let form = ProductForm {
            title: Some("  ".to_string()),
            ..ProductForm::default()
        };
        assert!(matches!(
            form.new_product(),
            Err(AppError::BadRequest(m)) if m == "Product title is required"
        ));
    }

    #[test]
    fn test_new_product_from_form() {
        let form = ProductForm {
            title: Some(" Canvas Tote Bag ".to_string()),
            vendor: Some("Double Exposure".to_string()),
            status: Some("active".to_string()),
            tags: Some("eco, , tote ".to_string()),
            ..ProductForm::default()
        };
        let product = form.new_product().ok();
        assert_eq!(product.as_ref().map(|p| p.title.as_str()), Some("Canvas Tote Bag"));
        assert_eq!(product.as_ref().map(|p| p.status), Some(ProductStatus::Active));
        assert_eq!(
            product.map(|p| p.tags).unwrap_or_default(),
            ["eco", "tote"]
        );
    }

    #[test]
    fn test_default_variant_price_and_sku() {
        let variant = ProductForm {
            price: Some("$12.5".to_string()),
            sku: Some(" CT-BLK-S ".to_string()),
            ..ProductForm::default()
        }
        .default_variant();
        assert_eq!(variant.price, "12.50");
        assert_eq!(variant.sku.as_deref(), Some("CT-BLK-S"));
        assert_eq!(
            variant.option_values,
            [("Title".to_string(), "Default Title".to_string())]
        );

        assert_eq!(ProductForm::default().default_variant().price, "0.00");
    }

    #[test]
    fn test_changes_need_product_id_and_valid_status() {
        assert!(matches!(
            ProductForm::default().changes(),
            Err(AppError::BadRequest(m)) if m == "Product ID is required"
        ));

        let form = ProductForm {
            id: Some("7".to_string()),
            status: Some("published".to_string()),
            ..ProductForm::default()
        };
        assert!(matches!(form.changes(), Err(AppError::BadRequest(_))));

        let form = ProductForm {
            id: Some("7".to_string()),
            title: Some("Premium Hoodie".to_string()),
            tags: Some(String::new()),
            ..ProductForm::default()
        };
        let changes = form.changes().ok();
        assert_eq!(
            changes.as_ref().map(|c| c.id.as_str()),
            Some("gid://shopify/Product/7")
        );
        assert_eq!(changes.as_ref().and_then(|c| c.tags.clone()), Some(Vec::new()));
        assert_eq!(changes.and_then(|c| c.vendor), None);
    }

    #[test]
    fn test_axis_values_falls_back_to_stored_configuration() {
        let config = ProductConfiguration {
            options: vec![ProductOption {
                id: None,
                name: "Decorations".to_string(),
                values: vec!["Embroidery".to_string()],
            }],
            metafields: vec![Metafield {
                namespace: "product_configurator".to_string(),
                key: "sizes".to_string(),
                value: r#"["S","M"]"#.to_string(),
            }],
            ..ProductConfiguration::default()
        };
        assert_eq!(axis_values(&config, Axis::Decoration), ["Embroidery"]);
        assert_eq!(axis_values(&config, Axis::Size), ["S", "M"]);
        assert!(axis_values(&config, Axis::Color).is_empty());
    }
}
