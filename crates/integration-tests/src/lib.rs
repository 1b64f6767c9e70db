//! Shared helpers for the configurator integration tests.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! The database pool connects lazily, so only tests that reach a query need
//! a running `PostgreSQL`; nothing here calls Shopify.
//!
//! # Test Categories
//!
//! - `wizard` - Setup wizard against an in-memory product catalog
//! - `embedded` - Embedded app launch and session handling
//! - `proxy` - App proxy signatures and webhooks

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;

use axum::Router;
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use product_configurator_admin::config::{AdminConfig, ShopifyConfig};
use product_configurator_admin::routes;
use product_configurator_admin::services::Notifier;
use product_configurator_admin::state::AppState;

/// API secret every signed test request uses.
pub const API_SECRET: &str = "integration_api_secret_value";
/// Store the test app is installed on.
pub const STORE: &str = "test-shop.myshopify.com";

/// Configuration pointing at a store that is never contacted.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/configurator_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        app_url: "https://configurator.test".to_string(),
        session_secret: SecretString::from("s".repeat(32)),
        shopify: ShopifyConfig {
            store: STORE.to_string(),
            api_version: "2025-01".to_string(),
            api_key: "test_api_key".to_string(),
            api_secret: SecretString::from(API_SECRET),
            access_token: SecretString::from("shpat_integration_token"),
        },
        shop_custom_domain: None,
        fixture_mode: true,
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Full application router with an in-memory session store.
///
/// # Panics
///
/// Panics if the lazy pool cannot be configured (must run inside a Tokio
/// runtime).
#[must_use]
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/configurator_test")
        .expect("lazy pool");
    let state = AppState::new(config, pool, Notifier::log_only());

    routes::routes(&state)
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
        .with_state(state)
}

fn hmac_bytes(message: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(API_SECRET.as_bytes()).expect("hmac key");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

fn encode(params: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Query string for an embedded launch, signed with `hmac`.
#[must_use]
pub fn signed_launch_query(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable();
    let message = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = hex::encode(hmac_bytes(message.as_bytes()));

    let mut all = params.to_vec();
    all.push(("hmac", digest.as_str()));
    encode(&all)
}

/// Query string for an app proxy request, signed with `signature`.
#[must_use]
pub fn signed_proxy_query(params: &[(&str, &str)]) -> String {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in params {
        grouped.entry(*key).or_default().push(*value);
    }
    let message: String = grouped
        .iter()
        .map(|(k, values)| format!("{k}={}", values.join(",")))
        .collect();
    let digest = hex::encode(hmac_bytes(message.as_bytes()));

    let mut all = params.to_vec();
    all.push(("signature", digest.as_str()));
    encode(&all)
}

/// Base64 webhook digest of `body`.
#[must_use]
pub fn webhook_signature(body: &[u8]) -> String {
    STANDARD.encode(hmac_bytes(body))
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn text_body(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
