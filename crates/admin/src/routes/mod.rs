//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Embedded admin (session from a verified launch)
//! GET  /app                              - Verify launch, start session
//! GET  /app/setup                        - Setup wizard
//! GET  /app/api/setup                    - Wizard data
//! POST /app/api/setup                    - Generate variants
//! POST /app/api/setup/validate           - Step validation
//! GET  /app/api/autocomplete             - Option suggestions
//! GET  /app/api/products[/search|/details|/variants|/sizes|/decorations]
//! GET  /app/api/settings, POST /app/api/settings
//! POST /app/api/fees/rebuild
//! GET  /app/api/orders, GET /app/api/orders/{id}, POST /app/api/orders/{id}/fulfill
//! GET  /designs, GET|POST /designs/{id}  - Design review
//!
//! # App proxy (signed storefront requests)
//! GET|POST /api/designs/draft, POST /api/designs/save
//! POST /api/designs/create, GET|POST /api/designs/configuration
//! POST /api/designs/status, POST /api/designs/files, POST /api/designs/upload
//! POST /api/files/stage, POST /api/files/complete
//! GET  /api/customer-designs, GET /api/fee-maps
//! GET  /apps/my-designs, GET|POST /apps/proof/{id}
//!
//! # Webhooks (HMAC header)
//! POST /webhooks/orders/create
//! ```

use axum::Router;

use crate::state::AppState;

pub mod designs;
pub mod orders;
pub mod products;
pub mod proxy;
pub mod settings;
pub mod setup;
pub mod webhooks;

/// Build the application router.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(setup::router())
        .merge(products::router())
        .merge(settings::router())
        .merge(orders::router())
        .merge(designs::router())
        .merge(proxy::router(state))
        .merge(webhooks::router())
}
