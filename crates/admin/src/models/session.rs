//! Session-related types for embedded app authentication.

use serde::{Deserialize, Serialize};

/// Session-stored shop identity.
///
/// Written once the embedded launch request's HMAC has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentShop {
    /// `*.myshopify.com` domain of the shop.
    pub shop: String,
    /// Base64 `host` parameter App Bridge needs to render inside the admin.
    pub host: Option<String>,
}

/// Session keys for embedded app state.
pub mod keys {
    /// Key for storing the authenticated shop.
    pub const CURRENT_SHOP: &str = "current_shop";
}
