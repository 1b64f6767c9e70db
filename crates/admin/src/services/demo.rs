//! Demo catalog for trying the configurator on an empty development store.
//!
//! Products go through the same chain as the setup wizard, so they come out
//! with every variant and the stored configuration. Failures are collected
//! per item and the import carries on with the next one.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use product_configurator_core::DesignStatus;

use super::configurator::{ConfigureRequest, WizardError, configure_product};
use super::designs::{DesignService, NewDesign};
use crate::shopify::{AdminClient, ProductChanges, ProductStatus};

const DEMO_VENDOR: &str = "Double Exposure";

/// A product in the demo catalog.
#[derive(Debug, Clone, Copy)]
pub struct DemoProduct {
    pub title: &'static str,
    pub description: &'static str,
    pub product_type: &'static str,
    pub colors: &'static [&'static str],
    pub sizes: &'static [&'static str],
    pub decorations: &'static [&'static str],
    pub base_price: &'static str,
}

pub const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        title: "Classic Cotton T-Shirt",
        description: "Premium 100% cotton t-shirt perfect for custom designs",
        product_type: "Apparel",
        colors: &["Black", "White", "Navy", "Red", "Royal Blue", "Forest Green"],
        sizes: &["XS", "S", "M", "L", "XL", "2XL"],
        decorations: &["Screenprint", "Embroidery", "Heat Transfer"],
        base_price: "15.99",
    },
    DemoProduct {
        title: "Premium Hoodie",
        description: "Comfortable fleece hoodie with kangaroo pocket",
        product_type: "Apparel",
        colors: &["Black", "Charcoal", "Navy", "Maroon", "Forest Green"],
        sizes: &["S", "M", "L", "XL", "2XL", "3XL"],
        decorations: &["Screenprint", "Embroidery", "Digital Print"],
        base_price: "35.99",
    },
    DemoProduct {
        title: "Performance Polo",
        description: "Moisture-wicking polo shirt for professional wear",
        product_type: "Apparel",
        colors: &["White", "Black", "Navy", "Red", "Kelly Green", "Royal Blue"],
        sizes: &["XS", "S", "M", "L", "XL", "2XL", "3XL"],
        decorations: &["Embroidery", "Heat Transfer"],
        base_price: "28.99",
    },
    DemoProduct {
        title: "Canvas Tote Bag",
        description: "Eco-friendly canvas tote bag for custom printing",
        product_type: "Accessories",
        colors: &["Natural", "Black", "Navy", "Red"],
        sizes: &["One Size"],
        decorations: &["Screenprint", "Heat Transfer", "Digital Print"],
        base_price: "12.99",
    },
    DemoProduct {
        title: "Baseball Cap",
        description: "Adjustable baseball cap with structured crown",
        product_type: "Accessories",
        colors: &["Black", "Navy", "Red", "White", "Khaki"],
        sizes: &["One Size"],
        decorations: &["Embroidery"],
        base_price: "18.99",
    },
];

/// A customer design submission in the demo catalog.
#[derive(Debug, Clone, Copy)]
pub struct DemoDesign {
    pub customer_email: &'static str,
    pub status: DesignStatus,
    pub decoration: &'static str,
    pub notes: &'static str,
    /// Title of the demo product the design is for.
    pub product_title: &'static str,
}

pub const DEMO_DESIGNS: &[DemoDesign] = &[
    DemoDesign {
        customer_email: "john.doe@example.com",
        status: DesignStatus::Pending,
        decoration: "Screenprint",
        notes: "Logo for company event t-shirts. Need 50 pieces in various sizes.",
        product_title: "Classic Cotton T-Shirt",
    },
    DemoDesign {
        customer_email: "sarah.smith@company.com",
        status: DesignStatus::Approved,
        decoration: "Embroidery",
        notes: "Corporate logo for polo shirts. High-quality embroidery preferred.",
        product_title: "Performance Polo",
    },
    DemoDesign {
        customer_email: "mike.johnson@startup.io",
        status: DesignStatus::InProduction,
        decoration: "Heat Transfer",
        notes: "Startup logo for team hoodies. Modern design with gradient colors.",
        product_title: "Premium Hoodie",
    },
    DemoDesign {
        customer_email: "lisa.brown@nonprofit.org",
        status: DesignStatus::Completed,
        decoration: "Screenprint",
        notes: "Charity event tote bags. Eco-friendly printing methods preferred.",
        product_title: "Canvas Tote Bag",
    },
];

impl DemoProduct {
    /// Wizard submission that creates this product.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Validation`] if the demo data is not a valid
    /// submission.
    pub fn configure_request(&self) -> Result<ConfigureRequest, WizardError> {
        ConfigureRequest::new(
            true,
            Some(self.title),
            None,
            product_configurator_core::OptionSet::new(self.colors, self.sizes, self.decorations),
            Some(self.base_price),
        )
    }

    /// Storefront fields the wizard leaves at its defaults.
    #[must_use]
    pub fn changes(&self, product_id: &str) -> ProductChanges {
        ProductChanges {
            id: product_id.to_string(),
            description_html: Some(format!("<p>{}</p>", self.description)),
            vendor: Some(DEMO_VENDOR.to_string()),
            product_type: Some(self.product_type.to_string()),
            status: Some(ProductStatus::Active),
            tags: Some(vec!["customizable".to_string(), "demo".to_string()]),
            ..ProductChanges::default()
        }
    }
}

impl DemoDesign {
    #[must_use]
    pub fn new_design(&self, product_id: Option<String>) -> NewDesign {
        NewDesign {
            product_id,
            customer_email: Some(self.customer_email.to_string()),
            status: Some(self.status),
            decoration: Some(self.decoration.to_string()),
            notes: Some(self.notes.to_string()),
            ..NewDesign::default()
        }
    }
}

/// What a demo import created.
#[derive(Debug, Default)]
pub struct DemoImport {
    /// Product GIDs keyed by title.
    pub products: HashMap<String, String>,
    /// Design metaobject GIDs.
    pub designs: Vec<String>,
    pub errors: Vec<String>,
}

impl DemoImport {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Successfully imported {} products and {} designs",
            self.products.len(),
            self.designs.len()
        )
    }
}

/// Create the demo products and designs in the store.
#[instrument(skip_all)]
pub async fn import_demo_data(client: &AdminClient, designs: &DesignService) -> DemoImport {
    let mut import = DemoImport::default();

    for product in DEMO_PRODUCTS {
        match import_product(client, product).await {
            Ok(product_id) => {
                info!(title = product.title, %product_id, "Imported demo product");
                import.products.insert(product.title.to_string(), product_id);
            }
            Err(message) => {
                warn!(title = product.title, error = %message, "Demo product failed");
                import
                    .errors
                    .push(format!("Error creating product {}: {message}", product.title));
            }
        }
    }

    if let Err(e) = designs.ensure_definition().await {
        import.errors.push(format!("Design definition unavailable: {e}"));
        return import;
    }

    for design in DEMO_DESIGNS {
        let product_id = import.products.get(design.product_title).cloned();
        match designs.create_design(&design.new_design(product_id)).await {
            Ok(created) => import.designs.push(created.id),
            Err(e) => import.errors.push(format!(
                "Error creating design for {}: {}",
                design.customer_email,
                e.public_message()
            )),
        }
    }

    import
}

async fn import_product(client: &AdminClient, product: &DemoProduct) -> Result<String, String> {
    let request = product.configure_request().map_err(|e| e.user_message())?;
    let outcome = configure_product(client, &request)
        .await
        .map_err(|e| e.user_message())?;
    client
        .update_product(&product.changes(&outcome.product_id))
        .await
        .map_err(|e| e.to_string())?;
    Ok(outcome.product_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_every_demo_product_is_a_valid_submission() {
        for product in DEMO_PRODUCTS {
            let request = product.configure_request().unwrap();
            assert!(request.price.is_positive(), "{}", product.title);
            assert_eq!(request.options.colors.len(), product.colors.len());
        }
    }

    #[test]
    fn test_demo_designs_point_at_demo_products() {
        for design in DEMO_DESIGNS {
            assert!(
                DEMO_PRODUCTS.iter().any(|p| p.title == design.product_title),
                "{}",
                design.product_title
            );
        }
    }

    #[test]
    fn test_changes_publish_the_product() {
        let changes = DEMO_PRODUCTS[0].changes("gid://shopify/Product/9");
        assert_eq!(changes.status, Some(ProductStatus::Active));
        assert_eq!(changes.vendor.as_deref(), Some("Double Exposure"));
        assert_eq!(changes.title, None);
        assert_eq!(
            changes.description_html.as_deref(),
            Some("<p>Premium 100% cotton t-shirt perfect for custom designs</p>")
        );
    }

    #[test]
    fn test_new_design_keeps_status() {
        let design = DEMO_DESIGNS[2].new_design(Some("gid://shopify/Product/3".to_string()));
        assert_eq!(design.status, Some(DesignStatus::InProduction));
        assert_eq!(design.decoration.as_deref(), Some("Heat Transfer"));
        assert_eq!(design.product_id.as_deref(), Some("gid://shopify/Product/3"));
    }

    #[test]
    fn test_summary() {
        let mut import = DemoImport::default();
        import
            .products
            .insert("Baseball Cap".to_string(), "gid://shopify/Product/1".to_string());
        assert_eq!(
            import.summary(),
            "Successfully imported 1 products and 0 designs"
        );
    }
}
