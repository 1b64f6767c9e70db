//! Product operations for the Admin API.

use std::collections::BTreeMap;

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, check_user_errors, missing,
    queries::{
        self, GetProductByHandle, GetProductConfiguration, GetProductDetails,
        GetProductOptionValues, GetProducts, ProductCreate, ProductOptionsCreate, ProductUpdate,
        ProductVariantsBulkCreate, product_variants_bulk_create::Strategy,
    },
};
use crate::shopify::types::{
    CreatedProduct, NewProduct, OptionInput, ProductChanges, ProductConfiguration, ProductDetails,
    ProductOption, ProductSortKey, ProductSummary, ProductWithVariants, VariantInput,
};

/// Metafields shown on the product detail endpoint.
const DETAIL_METAFIELD_KEYS: &[&str] = &[
    "product_configurator.colors",
    "product_configurator.sizes",
    "product_configurator.decorations",
    "product_configurator.base_price",
    "custom.colors",
    "custom.sizes",
    "custom.decorations",
    "custom.specs",
    "custom.specifications",
];

impl AdminClient {
    /// List products.
    ///
    /// # Arguments
    ///
    /// * `first` - Number of products to return
    /// * `query` - Optional Shopify search query (e.g. `title:*shirt*`)
    /// * `sort_key` - Optional sort order
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        first: i64,
        query: Option<String>,
        sort_key: Option<ProductSortKey>,
    ) -> Result<Vec<ProductSummary>, AdminShopifyError> {
        let variables = queries::get_products::Variables {
            first,
            query,
            sort_key,
        };

        let response = self.execute::<GetProducts>(variables).await?;
        Ok(response.products.nodes)
    }

    /// Options of the first `first` products, flattened.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn product_options(&self, first: i64) -> Result<Vec<ProductOption>, AdminShopifyError> {
        let variables = queries::get_product_option_values::Variables { first };
        let response = self.execute::<GetProductOptionValues>(variables).await?;

        Ok(response
            .products
            .nodes
            .into_iter()
            .flat_map(|product| product.options)
            .collect())
    }

    /// Options, variants and stored configuration of one product.
    ///
    /// Returns `None` when the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_configuration(
        &self,
        id: &str,
    ) -> Result<Option<ProductConfiguration>, AdminShopifyError> {
        let variables = queries::get_product_configuration::Variables { id: id.to_string() };
        let response = self.execute::<GetProductConfiguration>(variables).await?;

        Ok(response.product.map(|product| {
            let mut metafields = product.configurator.nodes;
            metafields.extend(product.legacy.nodes);
            ProductConfiguration {
                id: product.id,
                title: product.title,
                options: product.options,
                variants: product.variants.nodes,
                metafields,
            }
        }))
    }

    /// Product detail view with option values and configurator metafields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_details(
        &self,
        id: &str,
    ) -> Result<Option<ProductDetails>, AdminShopifyError> {
        let variables = queries::get_product_details::Variables {
            id: id.to_string(),
            keys: DETAIL_METAFIELD_KEYS.iter().map(ToString::to_string).collect(),
        };
        let response = self.execute::<GetProductDetails>(variables).await?;

        Ok(response.product.map(|product| {
            let options: BTreeMap<String, Vec<String>> = product
                .options
                .into_iter()
                .map(|option| (option.name.to_lowercase(), option.values))
                .collect();
            let metafields: BTreeMap<String, serde_json::Value> = product
                .metafields
                .nodes
                .iter()
                .map(|m| (m.identifier(), m.parsed_value()))
                .collect();

            ProductDetails {
                id: product.id,
                title: product.title,
                handle: product.handle,
                description: product.description,
                product_type: product.product_type,
                vendor: product.vendor,
                tags: product.tags,
                options,
                metafields,
                images: product.images.nodes,
                variants: product.variants.nodes,
            }
        }))
    }

    /// Look a product up by handle, with up to 250 variants.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<ProductWithVariants>, AdminShopifyError> {
        let variables = queries::get_product_by_handle::Variables {
            handle: handle.to_string(),
        };
        let response = self.execute::<GetProductByHandle>(variables).await?;

        Ok(response.product_by_handle.map(|product| ProductWithVariants {
            id: product.id,
            title: product.title,
            variants: product.variants.nodes,
        }))
    }

    /// Create a product with its options.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        use queries::product_create::{ProductCreateInput, Variables};

        let variables = Variables {
            product: ProductCreateInput {
                title: product.title.clone(),
                product_type: product.product_type.clone(),
                vendor: product.vendor.clone(),
                status: product.status,
                description_html: product.description_html.clone(),
                product_options: product.options.iter().map(option_create_input).collect(),
                handle: product.handle.clone(),
                tags: product.tags.clone(),
            },
        };

        let response = self.execute::<ProductCreate>(variables).await?;
        let payload = response
            .product_create
            .ok_or_else(|| missing("Failed to create product"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .product
            .ok_or_else(|| missing("Failed to create product"))
    }

    /// Update a product's basic fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, changes), fields(product_id = %changes.id))]
    pub async fn update_product(
        &self,
        changes: &ProductChanges,
    ) -> Result<CreatedProduct, AdminShopifyError> {
        use queries::product_update::{ProductUpdateInput, Variables};

        let variables = Variables {
            product: ProductUpdateInput {
                id: changes.id.clone(),
                title: changes.title.clone(),
                description_html: changes.description_html.clone(),
                vendor: changes.vendor.clone(),
                product_type: changes.product_type.clone(),
                status: changes.status,
                tags: changes.tags.clone(),
            },
        };

        let response = self.execute::<ProductUpdate>(variables).await?;
        let payload = response
            .product_update
            .ok_or_else(|| missing("Failed to update product"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .product
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Product {}", changes.id)))
    }

    /// Add options to an existing product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, options), fields(product_id = %product_id, count = options.len()))]
    pub async fn create_product_options(
        &self,
        product_id: &str,
        options: &[OptionInput],
    ) -> Result<(), AdminShopifyError> {
        let variables = queries::product_options_create::Variables {
            product_id: product_id.to_string(),
            options: options.iter().map(option_create_input).collect(),
        };

        let response = self.execute::<ProductOptionsCreate>(variables).await?;
        let payload = response
            .product_options_create
            .ok_or_else(|| missing("Failed to create product options"))?;
        check_user_errors(payload.user_errors)
    }

    /// Create variants in one bulk mutation.
    ///
    /// Returns the number of variants Shopify reports as created.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, variants), fields(product_id = %product_id, count = variants.len()))]
    pub async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[VariantInput],
    ) -> Result<usize, AdminShopifyError> {
        self.variants_bulk_create(product_id, variants, None).await
    }

    /// Replace a new product's "Default Title" variant with `variant`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, variant), fields(product_id = %product_id))]
    pub async fn replace_default_variant(
        &self,
        product_id: &str,
        variant: &VariantInput,
    ) -> Result<(), AdminShopifyError> {
        self.variants_bulk_create(
            product_id,
            std::slice::from_ref(variant),
            Some(Strategy::RemoveStandaloneVariant),
        )
        .await
        .map(|_| ())
    }

    async fn variants_bulk_create(
        &self,
        product_id: &str,
        variants: &[VariantInput],
        strategy: Option<Strategy>,
    ) -> Result<usize, AdminShopifyError> {
        let variables = queries::product_variants_bulk_create::Variables {
            product_id: product_id.to_string(),
            variants: variants.iter().map(bulk_variant_input).collect(),
            strategy,
        };

        let response = self.execute::<ProductVariantsBulkCreate>(variables).await?;
        let payload = response
            .product_variants_bulk_create
            .ok_or_else(|| missing("Failed to create variants"))?;
        check_user_errors(payload.user_errors)?;

        Ok(payload.product_variants.map_or(0, |created| created.len()))
    }
}

fn bulk_variant_input(
    variant: &VariantInput,
) -> queries::product_variants_bulk_create::ProductVariantsBulkInput {
    use queries::product_variants_bulk_create::{
        InventoryItemInput, ProductVariantsBulkInput, VariantOptionValueInput,
    };

    ProductVariantsBulkInput {
        option_values: variant
            .option_values
            .iter()
            .map(|(option_name, name)| VariantOptionValueInput {
                option_name: option_name.clone(),
                name: name.clone(),
            })
            .collect(),
        price: variant.price.clone(),
        inventory_policy: variant.inventory_policy,
        inventory_item: variant
            .sku
            .clone()
            .map(|sku| InventoryItemInput { sku }),
    }
}

fn option_create_input(option: &OptionInput) -> queries::product_create::OptionCreateInput {
    use queries::product_create::{OptionCreateInput, OptionValueCreateInput};

    OptionCreateInput {
        name: option.name.clone(),
        values: option
            .values
            .iter()
            .map(|value| OptionValueCreateInput { name: value.clone() })
            .collect(),
    }
}
