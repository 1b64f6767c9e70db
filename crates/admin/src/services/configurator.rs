//! Setup wizard orchestration.
//!
//! One submission runs a single chain of Shopify calls: create or load the
//! product, drop candidate variants that already exist, add missing
//! options, bulk-create the rest and store the configuration snapshot in
//! product metafields. Any failure stops the chain; earlier writes stay.

use std::collections::BTreeSet;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use product_configurator_core::{
    Axis, CandidateVariant, OptionSet, Price, ProductGid, filter_duplicates,
    generate_combinations,
};

use crate::shopify::{
    AdminClient, AdminShopifyError, CONFIGURATOR_NAMESPACE, CreatedProduct, InventoryPolicy,
    MetafieldInput, MetafieldType, NewProduct, OptionInput, ProductConfiguration, ProductOption,
    ProductStatus, VariantInput,
};

const NEW_PRODUCT_TYPE: &str = "Customizable Product";
const NEW_PRODUCT_VENDOR: &str = "Product Configurator";

const COMMUNICATION_FAILED: &str =
    "There was an issue communicating with Shopify. Please check your connection and try again.";
const AUTHENTICATION_FAILED: &str = "Authentication failed. Please refresh the page and try again.";
const INVALID_DATA: &str = "Invalid product data. Please check your inputs and try again.";
const UNEXPECTED: &str =
    "An unexpected error occurred while configuring the product. Please try again.";

/// Product catalog operations the wizard needs.
///
/// Implemented by [`AdminClient`]; tests use an in-memory catalog.
pub trait ProductCatalog: Send + Sync {
    fn product_configuration(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<ProductConfiguration>, AdminShopifyError>> + Send;

    fn create_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<CreatedProduct, AdminShopifyError>> + Send;

    fn create_product_options(
        &self,
        product_id: &str,
        options: &[OptionInput],
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;

    fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[VariantInput],
    ) -> impl Future<Output = Result<usize, AdminShopifyError>> + Send;

    fn set_metafields(
        &self,
        metafields: Vec<MetafieldInput>,
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;
}

impl ProductCatalog for AdminClient {
    async fn product_configuration(
        &self,
        id: &str,
    ) -> Result<Option<ProductConfiguration>, AdminShopifyError> {
        Self::get_product_configuration(self, id).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, AdminShopifyError> {
        Self::create_product(self, product).await
    }

    async fn create_product_options(
        &self,
        product_id: &str,
        options: &[OptionInput],
    ) -> Result<(), AdminShopifyError> {
        Self::create_product_options(self, product_id, options).await
    }

    async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[VariantInput],
    ) -> Result<usize, AdminShopifyError> {
        Self::bulk_create_variants(self, product_id, variants).await
    }

    async fn set_metafields(&self, metafields: Vec<MetafieldInput>) -> Result<(), AdminShopifyError> {
        Self::set_metafields(self, metafields).await.map(|_| ())
    }
}

/// Errors from a wizard submission.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Input rejected before any Shopify call.
    #[error("{0}")]
    Validation(String),

    /// Input that passed validation but cannot be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

impl WizardError {
    /// Message shown in the wizard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::InvalidInput(_) => INVALID_DATA.to_string(),
            Self::ProductNotFound => configuration_failed("Product not found"),
            Self::Shopify(AdminShopifyError::UserError(_)) => self
                .user_error()
                .unwrap_or_else(|| UNEXPECTED.to_string()),
            Self::Shopify(AdminShopifyError::Unauthorized(_)) => AUTHENTICATION_FAILED.to_string(),
            Self::Shopify(AdminShopifyError::NotFound(what)) => {
                configuration_failed(&format!("{what} not found"))
            }
            Self::Shopify(_) => COMMUNICATION_FAILED.to_string(),
        }
    }

    fn user_error(&self) -> Option<String> {
        match self {
            Self::Shopify(e) => e.first_user_error(),
            _ => None,
        }
    }
}

fn configuration_failed(message: &str) -> String {
    if message.trim().is_empty() {
        UNEXPECTED.to_string()
    } else {
        format!("Configuration failed: {message}")
    }
}

/// Target of a wizard submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductTarget {
    /// Create a product with this title.
    New { title: String },
    /// Configure an existing product.
    Existing { id: String },
}

/// A validated wizard submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub target: ProductTarget,
    pub options: OptionSet,
    pub price: Price,
}

impl ConfigureRequest {
    /// Validate raw wizard fields.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Validation`] with the message to show.
    pub fn new(
        creating_product: bool,
        title: Option<&str>,
        product_id: Option<&str>,
        options: OptionSet,
        price: Option<&str>,
    ) -> Result<Self, WizardError> {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let product_id = product_id.map(str::trim).filter(|id| !id.is_empty());

        let target = if creating_product {
            let title = title.ok_or_else(|| {
                WizardError::Validation(
                    "Product title is required when creating a new product.".to_string(),
                )
            })?;
            ProductTarget::New {
                title: title.to_string(),
            }
        } else {
            let id = product_id.ok_or_else(|| {
                WizardError::Validation(
                    "Please select an existing product or create a new one.".to_string(),
                )
            })?;
            ProductTarget::Existing { id: id.to_string() }
        };

        if !options.has_color_or_size() {
            return Err(WizardError::Validation(
                "Please add at least one color or size option to configure the product."
                    .to_string(),
            ));
        }

        Ok(Self {
            target,
            options,
            price: Price::parse_or_zero(price),
        })
    }

    const fn is_new(&self) -> bool {
        matches!(self.target, ProductTarget::New { .. })
    }
}

/// Result of a wizard submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureOutcome {
    pub product_id: String,
    pub message: String,
    pub created_variants: usize,
    pub skipped_variants: usize,
    /// Titles of the skipped variants.
    pub existing_variants: Vec<String>,
}

/// Run a wizard submission against `catalog`.
///
/// # Errors
///
/// Returns an error when the product cannot be found or any Shopify call
/// fails. Writes made before the failure are kept.
#[instrument(skip(catalog, request), fields(new_product = request.is_new()))]
pub async fn configure_product<C: ProductCatalog>(
    catalog: &C,
    request: &ConfigureRequest,
) -> Result<ConfigureOutcome, WizardError> {
    let options = &request.options;

    let (product_id, existing) = match &request.target {
        ProductTarget::New { title } => {
            let created = catalog.create_product(&new_product(title, options)).await?;
            info!(product_id = %created.id, "Created configurable product");
            (created.id, None)
        }
        ProductTarget::Existing { id } => {
            let gid = ProductGid::parse(id).map_err(|e| WizardError::InvalidInput(e.to_string()))?;
            let configuration = catalog
                .product_configuration(gid.as_str())
                .await?
                .ok_or(WizardError::ProductNotFound)?;
            (gid.as_str().to_string(), Some(configuration))
        }
    };

    let candidates = generate_combinations(
        &options.colors,
        &options.sizes,
        &options.decorations,
        request.price,
    );
    let signatures = existing
        .as_ref()
        .map(ProductConfiguration::existing_signatures)
        .unwrap_or_default();
    let result = filter_duplicates(&candidates, &signatures);

    if result.all_duplicates() {
        return Ok(ConfigureOutcome {
            message: format!(
                "All {} variant combination(s) already exist for this product. Existing variants: {}. No new variants were created.",
                result.skipped_count,
                result.skipped_titles.join(", ")
            ),
            product_id,
            created_variants: 0,
            skipped_variants: result.skipped_count,
            existing_variants: result.skipped_titles,
        });
    }

    if let Some(configuration) = &existing {
        let missing = missing_options(configuration, options);
        if !missing.is_empty() {
            catalog.create_product_options(&product_id, &missing).await?;
        }
    }

    if !result.created.is_empty() {
        let variants: Vec<VariantInput> = result.created.iter().map(variant_input).collect();
        let reported = catalog.bulk_create_variants(&product_id, &variants).await?;
        info!(
            product_id = %product_id,
            requested = variants.len(),
            reported,
            skipped = result.skipped_count,
            "Created variants"
        );
    }

    catalog
        .set_metafields(configuration_metafields(&product_id, options, request.price))
        .await?;

    let mut message = if request.is_new() {
        "Product created and configured successfully!".to_string()
    } else {
        "Product configured successfully!".to_string()
    };
    if result.skipped_count > 0 {
        message.push_str(&format!(
            " {} new variant(s) created. {} duplicate variant(s) were skipped.",
            result.created.len(),
            result.skipped_count
        ));
    }

    Ok(ConfigureOutcome {
        product_id,
        message,
        created_variants: result.created.len(),
        skipped_variants: result.skipped_count,
        existing_variants: result.skipped_titles,
    })
}

fn new_product(title: &str, options: &OptionSet) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        product_type: NEW_PRODUCT_TYPE.to_string(),
        vendor: NEW_PRODUCT_VENDOR.to_string(),
        status: ProductStatus::Draft,
        description_html: format!(
            "<p>Customizable {title} with multiple options for colors, sizes, and decorations.</p>"
        ),
        options: options
            .populated_axes()
            .map(|axis| OptionInput::for_axis(axis, options.values(axis)))
            .collect(),
        handle: None,
        tags: Vec::new(),
    }
}

/// Axis options the product does not have yet (exact name match).
fn missing_options(configuration: &ProductConfiguration, options: &OptionSet) -> Vec<OptionInput> {
    options
        .populated_axes()
        .filter(|axis| !configuration.has_option(axis.option_name()))
        .map(|axis| OptionInput::for_axis(axis, options.values(axis)))
        .collect()
}

fn variant_input(candidate: &CandidateVariant) -> VariantInput {
    VariantInput {
        option_values: candidate
            .option_values
            .iter()
            .map(|o| (o.axis.option_name().to_string(), o.value.clone()))
            .collect(),
        price: candidate.price.to_string(),
        inventory_policy: InventoryPolicy::Deny,
        sku: None,
    }
}

/// Metafields that let the wizard re-open a configured product.
#[must_use]
pub fn configuration_metafields(
    product_id: &str,
    options: &OptionSet,
    price: Price,
) -> Vec<MetafieldInput> {
    let list = |key: &str, values: &[String]| {
        MetafieldInput::new(
            product_id,
            CONFIGURATOR_NAMESPACE,
            key,
            MetafieldType::Json,
            serde_json::Value::from(values.to_vec()).to_string(),
        )
    };
    vec![
        list("colors", &options.colors),
        list("sizes", &options.sizes),
        list("decorations", &options.decorations),
        MetafieldInput::new(
            product_id,
            CONFIGURATOR_NAMESPACE,
            "base_price",
            MetafieldType::SingleLineText,
            price.to_string(),
        ),
    ]
}

/// Option values already used across the store, per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreOptionValues {
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub decorations: Vec<String>,
}

impl StoreOptionValues {
    /// Collect values from product options, trimmed, de-duplicated and sorted.
    #[must_use]
    pub fn collect(options: &[ProductOption]) -> Self {
        let mut colors = BTreeSet::new();
        let mut sizes = BTreeSet::new();
        let mut decorations = BTreeSet::new();

        for option in options {
            let bucket = match Axis::from_option_name(&option.name) {
                Some(Axis::Color) => &mut colors,
                Some(Axis::Size) => &mut sizes,
                Some(Axis::Decoration) => &mut decorations,
                None => continue,
            };
            bucket.extend(
                option
                    .values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(ToString::to_string),
            );
        }

        Self {
            colors: colors.into_iter().collect(),
            sizes: sizes.into_iter().collect(),
            decorations: decorations.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn values(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Color => &self.colors,
            Axis::Size => &self.sizes,
            Axis::Decoration => &self.decorations,
        }
    }
}
