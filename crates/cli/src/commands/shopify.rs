//! Shopify setup commands.
//!
//! Every command reads the same environment as the server (see
//! `product_configurator_admin::config`).

use std::path::Path;

use product_configurator_admin::config::AdminConfig;
use product_configurator_admin::services::{DesignService, Notifier, SettingsStore, demo, fees};
use product_configurator_admin::shopify::AdminClient;

/// Register the `design` metaobject definition unless it already exists.
///
/// # Errors
///
/// Returns an error if configuration is missing or Shopify rejects the
/// definition.
pub async fn ensure_definition() -> Result<(), Box<dyn std::error::Error>> {
    let (_, designs) = design_service()?;

    let definition = designs.ensure_definition().await?;
    tracing::info!(
        definition_id = %definition.id,
        kind = %definition.kind,
        "Design metaobject definition ready"
    );
    Ok(())
}

fn design_service() -> Result<(AdminClient, DesignService), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config.shopify);
    let designs = DesignService::new(
        client.clone(),
        SettingsStore::new(client.clone()),
        Notifier::log_only(),
        config.storefront_domain().to_string(),
    );
    Ok((client, designs))
}

/// Create the demo catalog. Items that fail are reported and skipped.
///
/// # Errors
///
/// Returns an error if configuration is missing or nothing was imported.
pub async fn import_demo() -> Result<(), Box<dyn std::error::Error>> {
    let (client, designs) = design_service()?;

    let import = demo::import_demo_data(&client, &designs).await;
    for error in &import.errors {
        tracing::warn!("{error}");
    }
    tracing::info!(
        products = import.products.len(),
        designs = import.designs.len(),
        "{}",
        import.summary()
    );

    if import.products.is_empty() && import.designs.is_empty() {
        return Err("Import failed: nothing was created".into());
    }
    Ok(())
}

/// Rebuild the screenprint fee map from the fee product `handle`.
///
/// # Errors
///
/// Returns an error if configuration is missing, the tiers file cannot be
/// read or the rebuild fails.
pub async fn rebuild_fees(
    handle: &str,
    tiers_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let client = AdminClient::new(&config.shopify);

    let tiers = tiers_file.map(std::fs::read_to_string).transpose()?;
    let rebuilt = fees::rebuild_screenprint_fees(&client, handle, tiers.as_deref()).await?;

    tracing::info!(
        tiers = rebuilt.tiers,
        variants = rebuilt.variants,
        "Screenprint fee map rebuilt"
    );
    Ok(())
}
