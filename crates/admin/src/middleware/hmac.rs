//! Shopify request signatures.
//!
//! Three schemes, all HMAC-SHA256 keyed with the app's API secret:
//!
//! - embedded admin launch: hex digest of the sorted `key=value` pairs
//!   joined with `&`, in the `hmac` query parameter
//! - app proxy: hex digest of the sorted `key=value` pairs concatenated
//!   with no separator (repeated keys joined with `,`), in `signature`
//! - webhooks: base64 digest of the raw body, in `X-Shopify-Hmac-Sha256`

use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Parameter carrying the embedded launch digest.
pub const HMAC_PARAM: &str = "hmac";
/// Parameter carrying the app proxy digest.
pub const SIGNATURE_PARAM: &str = "signature";

fn digest(secret: &str, message: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Decode a query string into its pairs, in order.
#[must_use]
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Verify the `hmac` parameter of an embedded admin request.
#[must_use]
pub fn verify_query_hmac(pairs: &[(String, String)], secret: &str) -> bool {
    let Some(provided) = pairs.iter().find(|(k, _)| k == HMAC_PARAM).map(|(_, v)| v) else {
        return false;
    };

    // Sort alphabetically by key, leaving out the digest itself
    let mut signed: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(k, _)| k != HMAC_PARAM && k != SIGNATURE_PARAM)
        .collect();
    signed.sort();
    let message = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    digest(secret, message.as_bytes())
        .is_some_and(|computed| constant_time_compare(&hex::encode(computed), provided))
}

/// Verify the `signature` parameter of an app proxy request.
#[must_use]
pub fn verify_proxy_signature(pairs: &[(String, String)], secret: &str) -> bool {
    let Some(provided) = pairs
        .iter()
        .find(|(k, _)| k == SIGNATURE_PARAM)
        .map(|(_, v)| v)
    else {
        return false;
    };

    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in pairs.iter().filter(|(k, _)| k != SIGNATURE_PARAM) {
        grouped.entry(key.as_str()).or_default().push(value.as_str());
    }
    let message: String = grouped
        .iter()
        .map(|(k, values)| format!("{k}={}", values.join(",")))
        .collect();

    digest(secret, message.as_bytes())
        .is_some_and(|computed| constant_time_compare(&hex::encode(computed), provided))
}

/// Verify a webhook body against its `X-Shopify-Hmac-Sha256` header.
#[must_use]
pub fn verify_webhook(body: &[u8], header: &str, secret: &str) -> bool {
    digest(secret, body)
        .is_some_and(|computed| constant_time_compare(&STANDARD.encode(computed), header.trim()))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Sign `pairs` the way Shopify signs app proxy requests.
#[cfg(test)]
pub(crate) fn sign_proxy(pairs: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = pairs.to_vec();
    sorted.sort();
    let message: String = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
    digest(secret, message.as_bytes()).map(hex::encode).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "hush";

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_query_hmac() {
        let message = "host=YWRtaW4&shop=test-shop.myshopify.com&timestamp=1700000000";
        let hmac = digest(SECRET, message.as_bytes()).map(hex::encode).unwrap();

        let mut pairs = owned(&[
            ("shop", "test-shop.myshopify.com"),
            ("timestamp", "1700000000"),
            ("host", "YWRtaW4"),
        ]);
        pairs.push((HMAC_PARAM.to_string(), hmac));
        assert!(verify_query_hmac(&pairs, SECRET));
        assert!(!verify_query_hmac(&pairs, "other"));

        pairs.retain(|(k, _)| k != "host");
        assert!(!verify_query_hmac(&pairs, SECRET));
    }

    #[test]
    fn test_proxy_signature() {
        let base = [
            ("shop", "test-shop.myshopify.com"),
            ("path_prefix", "/apps/configurator"),
            ("timestamp", "1700000000"),
        ];
        let signature = sign_proxy(&base, SECRET);
        let mut pairs = owned(&base);
        pairs.push((SIGNATURE_PARAM.to_string(), signature));

        assert!(verify_proxy_signature(&pairs, SECRET));

        pairs.push(("email".to_string(), "ana@example.com".to_string()));
        assert!(!verify_proxy_signature(&pairs, SECRET));
    }

    #[test]
    fn test_proxy_signature_joins_repeated_keys() {
        let message = "ids=1,2shop=s.myshopify.com";
        let signature = digest(SECRET, message.as_bytes()).map(hex::encode).unwrap();
        let mut pairs = owned(&[("ids", "1"), ("shop", "s.myshopify.com"), ("ids", "2")]);
        pairs.push((SIGNATURE_PARAM.to_string(), signature));
        assert!(verify_proxy_signature(&pairs, SECRET));
    }

    #[test]
    fn test_missing_signature() {
        assert!(!verify_proxy_signature(&owned(&[("shop", "s")]), SECRET));
        assert!(!verify_query_hmac(&[], SECRET));
    }

    #[test]
    fn test_webhook() {
        let body = br#"{"id":1}"#;
        let header = digest(SECRET, body).map(|d| STANDARD.encode(d)).unwrap();
        assert!(verify_webhook(body, &header, SECRET));
        assert!(!verify_webhook(b"{}", &header, SECRET));
    }

    #[test]
    fn test_query_pairs_decodes() {
        assert_eq!(
            query_pairs("email=a%2Bb%40example.com&x=1"),
            owned(&[("email", "a+b@example.com"), ("x", "1")])
        );
    }
}
