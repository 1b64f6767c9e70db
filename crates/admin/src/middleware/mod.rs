//! HTTP middleware for the configurator.
//!
//! - `session` - tower-sessions with a `PostgreSQL` store
//! - `auth` - embedded admin launch verification and [`RequireShop`]
//! - `app_proxy` - app proxy signature check for storefront endpoints
//! - `hmac` - Shopify signature schemes

pub mod app_proxy;
pub mod auth;
pub mod hmac;
pub mod session;

pub use app_proxy::{ProxyContext, require_app_proxy};
pub use auth::{RequireShop, relaunch_url, set_current_shop, verify_launch};
pub use session::create_session_layer;
