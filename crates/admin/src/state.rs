//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{DesignService, Notifier, SettingsStore};
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    shopify: AdminClient,
    settings: SettingsStore,
    designs: DesignService,
}

impl AppState {
    /// Wire up the shared services.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool, notifier: Notifier) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        let settings = SettingsStore::new(shopify.clone());
        let designs = DesignService::new(
            shopify.clone(),
            settings.clone(),
            notifier,
            config.storefront_domain().to_string(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                shopify,
                settings,
                designs,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    #[must_use]
    pub fn designs(&self) -> &DesignService {
        &self.inner.designs
    }

    /// Whether sample data may be served.
    #[must_use]
    pub fn fixture_mode(&self) -> bool {
        self.inner.config.fixture_mode
    }
}
