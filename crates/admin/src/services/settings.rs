//! App settings stored as shop metafields.
//!
//! [`SettingsStore::load`] and [`SettingsStore::save`] are the only way the
//! rest of the app reads or writes settings. Values are cached in-process
//! for 60 seconds and the cache is dropped on every save.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::shopify::{AdminClient, AdminShopifyError, Metafield, MetafieldInput, MetafieldType};

/// Metafield namespace holding the settings.
pub const SETTINGS_NAMESPACE: &str = "custom";

const CACHE_KEY: &str = "settings";
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Merchant-editable app settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub app_name: String,
    pub default_decoration_type: String,
    pub auto_approve_designs: bool,
    pub notification_email: String,
    pub max_file_size_mb: u64,
    pub allowed_file_types: Vec<String>,
    pub design_approval_required: bool,
    pub customer_notifications: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "Product Configurator".to_string(),
            default_decoration_type: "screenprint".to_string(),
            auto_approve_designs: false,
            notification_email: String::new(),
            max_file_size_mb: 10,
            allowed_file_types: ["jpg", "png", "pdf", "ai"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            design_approval_required: true,
            customer_notifications: true,
        }
    }
}

impl AppSettings {
    /// Read settings from shop metafields, keeping defaults for missing or
    /// unreadable keys.
    #[must_use]
    pub fn from_metafields(metafields: &[Metafield]) -> Self {
        let mut settings = Self::default();

        for metafield in metafields
            .iter()
            .filter(|m| m.namespace == SETTINGS_NAMESPACE)
        {
            let value = metafield.value.trim();
            match metafield.key.as_str() {
                "app_name" if !value.is_empty() => settings.app_name = value.to_string(),
                "default_decoration_type" if !value.is_empty() => {
                    settings.default_decoration_type = value.to_string();
                }
                "auto_approve_designs" => {
                    settings.auto_approve_designs = parse_flag(value, settings.auto_approve_designs);
                }
                "notification_email" => settings.notification_email = value.to_string(),
                "max_file_size_mb" => {
                    if let Ok(mb) = value.parse() {
                        settings.max_file_size_mb = mb;
                    }
                }
                "allowed_file_types" => settings.allowed_file_types = parse_list(value),
                "design_approval_required" => {
                    settings.design_approval_required =
                        parse_flag(value, settings.design_approval_required);
                }
                "customer_notifications" => {
                    settings.customer_notifications =
                        parse_flag(value, settings.customer_notifications);
                }
                _ => {}
            }
        }

        settings
    }

    /// Metafield writes for every setting, owned by `shop_id`.
    #[must_use]
    pub fn to_metafield_inputs(&self, shop_id: &str) -> Vec<MetafieldInput> {
        let text = |key: &str, value: String| {
            MetafieldInput::new(
                shop_id,
                SETTINGS_NAMESPACE,
                key,
                MetafieldType::SingleLineText,
                value,
            )
        };
        let flag = |key: &str, value: bool| {
            MetafieldInput::new(
                shop_id,
                SETTINGS_NAMESPACE,
                key,
                MetafieldType::Boolean,
                value.to_string(),
            )
        };

        let mut inputs = vec![
            text("app_name", self.app_name.clone()),
            text("default_decoration_type", self.default_decoration_type.clone()),
            flag("auto_approve_designs", self.auto_approve_designs),
            text("max_file_size_mb", self.max_file_size_mb.to_string()),
            text("allowed_file_types", self.allowed_file_types.join(",")),
            flag("design_approval_required", self.design_approval_required),
            flag("customer_notifications", self.customer_notifications),
        ];
        // Shopify rejects blank metafield values.
        if !self.notification_email.trim().is_empty() {
            inputs.push(text("notification_email", self.notification_email.trim().to_string()));
        }
        inputs
    }

    /// Reject values the rest of the app cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("App name is required".to_string());
        }
        if self.max_file_size_mb == 0 {
            return Err("Max file size must be at least 1MB".to_string());
        }
        let email = self.notification_email.trim();
        if !email.is_empty() && product_configurator_core::Email::parse(email).is_err() {
            return Err("Notification email is not a valid email address".to_string());
        }
        Ok(())
    }
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        _ => default,
    }
}

/// Accepts a JSON array or a comma-separated list.
fn parse_list(value: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(value).unwrap_or_else(|_| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

/// Settings plus the shop that owns them.
#[derive(Debug, Clone)]
struct CachedSettings {
    shop_id: String,
    settings: AppSettings,
}

/// Cached read/write access to [`AppSettings`].
#[derive(Clone)]
pub struct SettingsStore {
    client: AdminClient,
    cache: Cache<&'static str, CachedSettings>,
}

impl SettingsStore {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CACHE_TTL)
            .build();
        Self { client, cache }
    }

    /// Current settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop metafields cannot be read.
    pub async fn load(&self) -> Result<AppSettings, AdminShopifyError> {
        Ok(self.load_cached().await?.settings)
    }

    /// Shop GID, reusing the cached settings lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop cannot be read.
    pub async fn shop_id(&self) -> Result<String, AdminShopifyError> {
        Ok(self.load_cached().await?.shop_id)
    }

    async fn load_cached(&self) -> Result<CachedSettings, AdminShopifyError> {
        if let Some(cached) = self.cache.get(CACHE_KEY).await {
            debug!("Cache hit for settings");
            return Ok(cached);
        }

        let (shop_id, metafields) = self.client.get_shop_metafields(SETTINGS_NAMESPACE).await?;
        let cached = CachedSettings {
            shop_id,
            settings: AppSettings::from_metafields(&metafields),
        };
        self.cache.insert(CACHE_KEY, cached.clone()).await;
        Ok(cached)
    }

    /// Write all settings and drop the cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if Shopify rejects the metafields.
    #[instrument(skip(self, settings))]
    pub async fn save(&self, settings: &AppSettings) -> Result<(), AdminShopifyError> {
        let shop_id = self.shop_id().await?;
        let result = self
            .client
            .set_metafields(settings.to_metafield_inputs(&shop_id))
            .await;
        self.cache.invalidate(CACHE_KEY).await;
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metafield(key: &str, value: &str) -> Metafield {
        Metafield {
            namespace: SETTINGS_NAMESPACE.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        assert_eq!(AppSettings::from_metafields(&[]), AppSettings::default());
    }

    #[test]
    fn test_from_metafields() {
        let settings = AppSettings::from_metafields(&[
            metafield("app_name", "Tee Builder"),
            metafield("auto_approve_designs", "true"),
            metafield("max_file_size_mb", "25"),
            metafield("allowed_file_types", "png, svg"),
            metafield("customer_notifications", "false"),
            metafield("design_approval_required", "maybe"),
            metafield("fee_map_scr", "{}"),
        ]);
        assert_eq!(settings.app_name, "Tee Builder");
        assert!(settings.auto_approve_designs);
        assert_eq!(settings.max_file_size_mb, 25);
        assert_eq!(settings.allowed_file_types, ["png", "svg"]);
        assert!(!settings.customer_notifications);
        assert!(settings.design_approval_required);
    }

    #[test]
    fn test_list_accepts_json() {
        assert_eq!(parse_list(r#"["ai","pdf"]"#), ["ai", "pdf"]);
    }

    #[test]
    fn test_to_metafield_inputs_types() {
        let inputs = AppSettings::default().to_metafield_inputs("gid://shopify/Shop/1");
        let by_key = |key: &str| inputs.iter().find(|i| i.key == key);

        assert_eq!(
            by_key("auto_approve_designs").map(|i| i.kind),
            Some(MetafieldType::Boolean)
        );
        assert_eq!(
            by_key("allowed_file_types").map(|i| i.value.as_str()),
            Some("jpg,png,pdf,ai")
        );
        assert!(by_key("notification_email").is_none());
        assert!(inputs.iter().all(|i| i.owner_id == "gid://shopify/Shop/1"));
    }

    #[test]
    fn test_round_trip_through_metafields() {
        let settings = AppSettings {
            notification_email: "ops@example.com".to_string(),
            auto_approve_designs: true,
            ..AppSettings::default()
        };
        let stored: Vec<Metafield> = settings
            .to_metafield_inputs("gid://shopify/Shop/1")
            .into_iter()
            .map(|i| metafield(&i.key, &i.value))
            .collect();
        assert_eq!(AppSettings::from_metafields(&stored), settings);
    }

    #[test]
    fn test_validate() {
        assert!(AppSettings::default().validate().is_ok());
        let bad = AppSettings {
            notification_email: "nope".to_string(),
            ..AppSettings::default()
        };
        assert!(bad.validate().is_err());
    }
}
