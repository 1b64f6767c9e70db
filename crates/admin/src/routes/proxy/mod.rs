//! Storefront endpoints reached through the Shopify app proxy.
//!
//! Every route here sits behind [`require_app_proxy`], so handlers can
//! assume the query string was signed by Shopify.

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest},
    middleware,
};

use crate::error::AppError;
use crate::middleware::require_app_proxy;
use crate::state::AppState;

mod customer;
mod designs;
mod drafts;
mod files;

/// Largest body a proxy request may carry.
///
/// Four 10 MB design sides sent as base64 data URLs, plus the JSON around
/// them.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// `Json` extractor whose rejections use the `{success, error}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ProxyJson<T>(pub T);

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(drafts::router())
        .merge(designs::router())
        .merge(files::router())
        .merge(customer::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_app_proxy))
}
