//! App proxy request verification.
//!
//! Storefront widgets reach the app through the Shopify app proxy, which
//! signs every forwarded query string. Unsigned requests never reach the
//! proxy handlers.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use super::hmac::{query_pairs, verify_proxy_signature};
use crate::error::AppError;
use crate::state::AppState;

/// What the proxy tells us about the storefront visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyContext {
    pub shop: String,
    /// Set when the visitor is signed in to a customer account.
    pub logged_in_customer_id: Option<String>,
}

impl ProxyContext {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let param = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };
        Self {
            shop: param("shop").unwrap_or_default(),
            logged_in_customer_id: param("logged_in_customer_id"),
        }
    }
}

/// Reject requests without a valid app proxy signature.
///
/// # Errors
///
/// Returns `Unauthorized` when the signature is missing or wrong.
pub async fn require_app_proxy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let pairs = query_pairs(request.uri().query().unwrap_or_default());
    let secret = state.config().shopify.api_secret.expose_secret();
    if !verify_proxy_signature(&pairs, secret) {
        return Err(AppError::Unauthorized(
            "Invalid app proxy signature".to_string(),
        ));
    }

    let context = ProxyContext::from_pairs(&pairs);
    crate::error::set_sentry_shop(&context.shop);
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for ProxyContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Invalid app proxy signature".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_pairs() {
        let pairs = vec![
            ("shop".to_string(), "s.myshopify.com".to_string()),
            ("logged_in_customer_id".to_string(), String::new()),
        ];
        let context = ProxyContext::from_pairs(&pairs);
        assert_eq!(context.shop, "s.myshopify.com");
        assert_eq!(context.logged_in_customer_id, None);
    }
}
