//! Setup wizard submissions against an in-memory product catalog.

use std::sync::Mutex;

use product_configurator_admin::services::{
    ConfigureRequest, ProductCatalog, WizardError, configure_product,
};
use product_configurator_admin::shopify::{
    AdminShopifyError, CreatedProduct, MetafieldInput, NewProduct, OptionInput,
    ProductConfiguration, ProductOption, ProductVariant, SelectedOption, VariantInput,
};
use product_configurator_core::OptionSet;

#[derive(Default)]
struct Calls {
    created_products: Vec<NewProduct>,
    created_options: Vec<OptionInput>,
    created_variants: Vec<VariantInput>,
    metafields: Vec<MetafieldInput>,
}

/// Catalog holding at most one product.
#[derive(Default)]
struct FakeCatalog {
    product: Option<ProductConfiguration>,
    fail_variants: bool,
    calls: Mutex<Calls>,
}

impl FakeCatalog {
    fn with_product(product: ProductConfiguration) -> Self {
        Self {
            product: Some(product),
            ..Self::default()
        }
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().expect("calls lock")
    }
}

impl ProductCatalog for FakeCatalog {
    async fn product_configuration(
        &self,
        id: &str,
    ) -> Result<Option<ProductConfiguration>, AdminShopifyError> {
        Ok(self.product.clone().filter(|p| p.id == id))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, AdminShopifyError> {
        self.calls().created_products.push(product.clone());
        Ok(CreatedProduct {
            id: "gid://shopify/Product/900".to_string(),
            title: product.title.clone(),
            handle: product.title.to_lowercase().replace(' ', "-"),
        })
    }

    async fn create_product_options(
        &self,
        _product_id: &str,
        options: &[OptionInput],
    ) -> Result<(), AdminShopifyError> {
        self.calls().created_options.extend_from_slice(options);
        Ok(())
    }

    async fn bulk_create_variants(
        &self,
        _product_id: &str,
        variants: &[VariantInput],
    ) -> Result<usize, AdminShopifyError> {
        if self.fail_variants {
            return Err(AdminShopifyError::RateLimited(2));
        }
        self.calls().created_variants.extend_from_slice(variants);
        Ok(variants.len())
    }

    async fn set_metafields(&self, metafields: Vec<MetafieldInput>) -> Result<(), AdminShopifyError> {
        self.calls().metafields.extend(metafields);
        Ok(())
    }
}

fn existing_tee() -> ProductConfiguration {
    let variant = |id: u32, color: &str, size: &str| ProductVariant {
        id: format!("gid://shopify/ProductVariant/{id}"),
        title: format!("{color} / {size}"),
        price: Some("20.00".to_string()),
        sku: None,
        inventory_quantity: None,
        selected_options: vec![
            SelectedOption {
                name: "Color".to_string(),
                value: color.to_string(),
            },
            SelectedOption {
                name: "Size".to_string(),
                value: size.to_string(),
            },
        ],
    };
    ProductConfiguration {
        id: "gid://shopify/Product/42".to_string(),
        title: "Tee".to_string(),
        options: vec![
            ProductOption {
                id: None,
                name: "Color".to_string(),
                values: vec!["Red".to_string()],
            },
            ProductOption {
                id: None,
                name: "Size".to_string(),
                values: vec!["S".to_string(), "M".to_string()],
            },
        ],
        variants: vec![variant(1, "Red", "S"), variant(2, "Red", "M")],
        metafields: Vec::new(),
    }
}

fn option_names(variant: &VariantInput) -> Vec<&str> {
    variant.option_values.iter().map(|(name, _)| name.as_str()).collect()
}

#[tokio::test]
async fn new_product_gets_every_combination() {
    let catalog = FakeCatalog::default();
    let request = ConfigureRequest::new(
        true,
        Some("Classic Tee"),
        None,
        OptionSet::new(vec!["Red", "Blue"], vec!["S", "M", "L"], vec![]),
        Some("19.99"),
    )
    .expect("valid request");

    let outcome = configure_product(&catalog, &request).await.expect("configured");

    assert_eq!(outcome.product_id, "gid://shopify/Product/900");
    assert_eq!(outcome.created_variants, 6);
    assert_eq!(outcome.skipped_variants, 0);
    assert_eq!(outcome.message, "Product created and configured successfully!");

    let calls = catalog.calls();
    assert_eq!(calls.created_products.len(), 1);
    assert!(calls.created_options.is_empty());
    assert_eq!(calls.created_variants.len(), 6);
    assert!(calls.created_variants.iter().all(|v| v.price == "19.99"));
    assert_eq!(
        calls.created_variants.first().map(option_names),
        Some(vec!["Color", "Size"])
    );
    assert_eq!(calls.metafields.len(), 4);
}

#[tokio::test]
async fn existing_product_skips_duplicates_and_adds_missing_option() {
    let catalog = FakeCatalog::with_product(existing_tee());
    let request = ConfigureRequest::new(
        false,
        None,
        Some("42"),
        OptionSet::new(vec!["red", "Blue"], vec!["S"], vec!["Screenprint"]),
        None,
    )
    .expect("valid request");

    let outcome = configure_product(&catalog, &request).await.expect("configured");

    // Red/S/Screenprint differs from Red/S, so nothing collides
    assert_eq!(outcome.created_variants, 2);
    assert_eq!(outcome.skipped_variants, 0);

    let calls = catalog.calls();
    let added: Vec<&str> = calls.created_options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(added, ["Decoration"]);
    assert!(calls.created_products.is_empty());
}

#[tokio::test]
async fn partial_duplicates_are_reported() {
    let catalog = FakeCatalog::with_product(existing_tee());
    let request = ConfigureRequest::new(
        false,
        None,
        Some("gid://shopify/Product/42"),
        OptionSet::new(vec!["RED"], vec!["s", "m", "L"], vec![]),
        Some("25"),
    )
    .expect("valid request");

    let outcome = configure_product(&catalog, &request).await.expect("configured");

    assert_eq!(outcome.created_variants, 1);
    assert_eq!(outcome.skipped_variants, 2);
    assert_eq!(outcome.existing_variants, ["RED / s", "RED / m"]);
    assert_eq!(
        outcome.message,
        "Product configured successfully! 1 new variant(s) created. 2 duplicate variant(s) were skipped."
    );
    assert!(catalog.calls().created_options.is_empty());
}

#[tokio::test]
async fn all_duplicates_writes_nothing() {
    let catalog = FakeCatalog::with_product(existing_tee());
    let request = ConfigureRequest::new(
        false,
        None,
        Some("42"),
        OptionSet::new(vec!["Red"], vec!["M", "S"], vec![]),
        None,
    )
    .expect("valid request");

    let outcome = configure_product(&catalog, &request).await.expect("configured");

    assert_eq!(outcome.created_variants, 0);
    assert_eq!(outcome.skipped_variants, 2);
    assert!(outcome.message.starts_with("All 2 variant combination(s) already exist"));

    let calls = catalog.calls();
    assert!(calls.created_variants.is_empty());
    assert!(calls.metafields.is_empty());
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let catalog = FakeCatalog::with_product(existing_tee());
    let request = ConfigureRequest::new(
        false,
        None,
        Some("7"),
        OptionSet::new(vec!["Red"], vec![], vec![]),
        None,
    )
    .expect("valid request");

    let err = configure_product(&catalog, &request).await.err();
    assert!(matches!(err, Some(WizardError::ProductNotFound)));
}

#[tokio::test]
async fn shopify_failure_stops_before_metafields() {
    let catalog = FakeCatalog {
        fail_variants: true,
        ..FakeCatalog::default()
    };
    let request = ConfigureRequest::new(
        true,
        Some("Hoodie"),
        None,
        OptionSet::new(vec!["Black"], vec!["XL"], vec![]),
        None,
    )
    .expect("valid request");

    let err = configure_product(&catalog, &request).await.err().expect("error");
    assert_eq!(
        err.user_message(),
        "There was an issue communicating with Shopify. Please check your connection and try again."
    );

    let calls = catalog.calls();
    assert_eq!(calls.created_products.len(), 1);
    assert!(calls.metafields.is_empty());
}
