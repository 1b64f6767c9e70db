//! Embedded admin authentication.
//!
//! Shopify opens the app at `/app?shop=...&host=...&timestamp=...&hmac=...`.
//! Once that signature is verified the shop is stored in the session and
//! [`RequireShop`] lets later requests through.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use tower_sessions::Session;

use super::hmac::{query_pairs, verify_query_hmac};
use crate::config::ShopifyConfig;
use crate::error::AppError;
use crate::models::{CurrentShop, session_keys};
use crate::state::AppState;

/// Oldest launch timestamp accepted, in seconds.
const MAX_LAUNCH_AGE_SECONDS: i64 = 300;

/// Verify an embedded launch query and return the shop it is for.
///
/// # Errors
///
/// Returns `Unauthorized` for a missing, stale or wrong signature and
/// `Forbidden` when the request is for a different shop.
pub fn verify_launch(
    query: &str,
    shopify: &ShopifyConfig,
    now: i64,
) -> Result<CurrentShop, AppError> {
    let pairs = query_pairs(query);
    if !verify_query_hmac(&pairs, shopify.api_secret.expose_secret()) {
        return Err(AppError::Unauthorized("Invalid request signature".to_string()));
    }

    let param = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let timestamp: i64 = param("timestamp")
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing timestamp".to_string()))?;
    if (now - timestamp).abs() > MAX_LAUNCH_AGE_SECONDS {
        return Err(AppError::Unauthorized("Request timestamp too old".to_string()));
    }

    let shop = param("shop").unwrap_or_default();
    if !shop.eq_ignore_ascii_case(&shopify.store) {
        return Err(AppError::Forbidden(format!("App is not installed for {shop}")));
    }

    Ok(CurrentShop {
        shop,
        host: param("host"),
    })
}

/// Extractor that requires a verified shop in the session.
///
/// API requests without one get 401; page requests are sent back through
/// the Shopify admin so a freshly signed launch URL is issued.
pub struct RequireShop(pub CurrentShop);

/// Rejection for [`RequireShop`].
pub enum ShopAuthRejection {
    /// Reopen the app from the Shopify admin.
    Relaunch(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for ShopAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Relaunch(url) => Redirect::to(&url).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({
                    "success": false,
                    "error": "Authentication failed. Please refresh the page and try again."
                })),
            )
                .into_response(),
        }
    }
}

/// Admin URL that relaunches the embedded app.
#[must_use]
pub fn relaunch_url(shopify: &ShopifyConfig) -> String {
    format!("https://{}/admin/apps/{}", shopify.store, shopify.api_key)
}

impl FromRequestParts<AppState> for RequireShop {
    type Rejection = ShopAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_api = parts.uri.path().starts_with("/app/api/");
        let reject = || {
            if is_api {
                ShopAuthRejection::Unauthorized
            } else {
                ShopAuthRejection::Relaunch(relaunch_url(&state.config().shopify))
            }
        };

        let session = parts.extensions.get::<Session>().ok_or_else(reject)?;
        let shop: CurrentShop = session
            .get(session_keys::CURRENT_SHOP)
            .await
            .ok()
            .flatten()
            .ok_or_else(reject)?;

        crate::error::set_sentry_shop(&shop.shop);
        Ok(Self(shop))
    }
}

/// Store the verified shop in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shop(
    session: &Session,
    shop: &CurrentShop,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SHOP, shop).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::tests::test_shopify;

    fn signed_query(shop: &str, timestamp: i64) -> String {
        let secret = test_shopify().api_secret.expose_secret().to_string();
        let message = format!("host=YWRtaW4&shop={shop}&timestamp={timestamp}");
        let hmac = {
            use ::hmac::{Hmac, Mac};
            let mut mac = Hmac::<sha2::Sha256>::new_from_slice(secret.as_bytes())
                .unwrap();
            mac.update(message.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        };
        format!("{message}&hmac={hmac}")
    }

    #[test]
    fn test_verify_launch() {
        let now = 1_700_000_000;
        let shop = verify_launch(&signed_query("test-shop.myshopify.com", now), &test_shopify(), now + 10)
            .unwrap();
        assert_eq!(shop.shop, "test-shop.myshopify.com");
        assert_eq!(shop.host.as_deref(), Some("YWRtaW4"));
    }

    #[test]
    fn test_verify_launch_rejects_stale_and_foreign() {
        let now = 1_700_000_000;
        let stale = verify_launch(&signed_query("test-shop.myshopify.com", now), &test_shopify(), now + 600);
        assert!(matches!(stale, Err(AppError::Unauthorized(_))));

        let foreign = verify_launch(&signed_query("other.myshopify.com", now), &test_shopify(), now);
        assert!(matches!(foreign, Err(AppError::Forbidden(_))));

        let tampered = signed_query("test-shop.myshopify.com", now).replace("YWRtaW4", "ZXZpbA");
        assert!(matches!(
            verify_launch(&tampered, &test_shopify(), now),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_relaunch_url() {
        assert_eq!(
            relaunch_url(&test_shopify()),
            "https://test-shop.myshopify.com/admin/apps/test_api_key"
        );
    }
}
