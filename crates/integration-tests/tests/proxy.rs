//! App proxy signatures and the order webhook.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use product_configurator_integration_tests::{
    STORE, json_body, signed_proxy_query, test_app, text_body, webhook_signature,
};

const TIMESTAMP: &str = "1717000000";

#[tokio::test]
async fn unsigned_proxy_request_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::get("/apps/my-designs?shop=test-shop.myshopify.com")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Unauthorized: Invalid app proxy signature");
}

#[tokio::test]
async fn tampered_proxy_request_is_rejected() {
    let query = signed_proxy_query(&[
        ("customerEmail", "jane@example.com"),
        ("shop", STORE),
        ("timestamp", TIMESTAMP),
    ])
    .replace("jane", "john");

    let response = test_app()
        .oneshot(
            Request::get(format!("/api/customer-designs?{query}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_designs_need_an_identity() {
    let query = signed_proxy_query(&[("shop", STORE), ("timestamp", TIMESTAMP)]);

    let response = test_app()
        .oneshot(
            Request::get(format!("/api/customer-designs?{query}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Customer ID or email is required");
}

#[tokio::test]
async fn signed_customer_designs_serve_samples_in_fixture_mode() {
    let query = signed_proxy_query(&[
        ("customerEmail", "jane@example.com"),
        ("shop", STORE),
        ("timestamp", TIMESTAMP),
    ]);

    let response = test_app()
        .oneshot(
            Request::get(format!("/api/customer-designs?{query}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["designs"].as_array().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn my_designs_without_email_lists_nothing() {
    let query = signed_proxy_query(&[("shop", STORE), ("timestamp", TIMESTAMP)]);

    let response = test_app()
        .oneshot(
            Request::get(format!("/apps/my-designs?{query}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let html = text_body(response).await;
    assert!(html.contains("My Designs"));
    assert!(html.contains("No designs found."));
}

const THREE_MIB: usize = 3 * 1024 * 1024;

fn signed_post(path: &str, content_type: &str, body: Vec<u8>) -> Request<Body> {
    let query = signed_proxy_query(&[("shop", STORE), ("timestamp", TIMESTAMP)]);
    Request::post(format!("{path}?{query}"))
        .header("Content-Type", content_type)
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn multipart_upload_above_two_megabytes_is_read() {
    let boundary = "configurator-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend(std::iter::repeat_n(b'x', THREE_MIB));
    body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());

    let response = test_app()
        .oneshot(signed_post(
            "/api/designs/upload",
            &format!("multipart/form-data; boundary={boundary}"),
            body,
        ))
        .await
        .expect("response");

    // The whole form was read; only the missing side stops the upload.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Side parameter is required");
}

#[tokio::test]
async fn json_files_above_two_megabytes_are_read() {
    let image = format!("data:image/png;base64,{}", "!".repeat(THREE_MIB));
    let payload = serde_json::json!({ "id": "gid://shopify/Metaobject/1", "images": { "front": image } });

    let response = test_app()
        .oneshot(signed_post(
            "/api/designs/files",
            "application/json",
            serde_json::to_vec(&payload).expect("json"),
        ))
        .await
        .expect("response");

    // Parsed past the body limit and rejected on the data URL itself.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid data URL");
}

#[tokio::test]
async fn oversized_json_body_uses_error_envelope() {
    let image = "a".repeat(65 * 1024 * 1024);
    let payload = serde_json::json!({ "id": "gid://shopify/Metaobject/1", "images": { "front": image } });

    let response = test_app()
        .oneshot(signed_post(
            "/api/designs/files",
            "application/json",
            serde_json::to_vec(&payload).expect("json"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Request body is too large");
}

fn webhook(body: &str, signature: &str) -> Request<Body> {
    Request::post("/webhooks/orders/create")
        .header("X-Shopify-Hmac-Sha256", signature)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn webhook_with_bad_signature_is_unauthorized() {
    let body = r#"{"id": 1001, "line_items": []}"#;

    let response = test_app()
        .oneshot(webhook(body, "bm90IHRoZSByaWdodCBkaWdlc3Q="))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_without_designs_is_acknowledged() {
    let body = r#"{
        "id": 1001,
        "admin_graphql_api_id": "gid://shopify/Order/1001",
        "line_items": [{"properties": [{"name": "Gift wrap", "value": "yes"}]}]
    }"#;

    let response = test_app()
        .oneshot(webhook(body, &webhook_signature(body.as_bytes())))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}
