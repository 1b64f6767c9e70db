//! Embedded admin launch and session handling.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use product_configurator_integration_tests::{
    STORE, json_body, signed_launch_query, test_app,
};

fn now() -> String {
    chrono::Utc::now().timestamp().to_string()
}

fn validate_request(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/app/api/setup/validate")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(
            serde_json::json!({
                "step": 2,
                "creating_product": true,
                "title": "Classic Tee",
                "colors": ["Red", "Blue"],
                "sizes": ["S", "M", "L"],
                "price": "19.99"
            })
            .to_string(),
        ))
        .expect("request")
}

#[tokio::test]
async fn api_without_launch_is_unauthorized() {
    let response = test_app()
        .oneshot(validate_request(None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Authentication failed. Please refresh the page and try again."
    );
}

#[tokio::test]
async fn page_without_launch_relaunches_from_admin() {
    let response = test_app()
        .oneshot(Request::get("/app/setup").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("https://test-shop.myshopify.com/admin/apps/test_api_key")
    );
}

#[tokio::test]
async fn tampered_launch_is_rejected() {
    let timestamp = now();
    let query = signed_launch_query(&[("shop", STORE), ("timestamp", &timestamp)])
        .replace("test-shop", "other-shop");

    let response = test_app()
        .oneshot(Request::get(format!("/app?{query}")).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn launch_for_another_shop_is_forbidden() {
    let timestamp = now();
    let query = signed_launch_query(&[
        ("shop", "someone-else.myshopify.com"),
        ("timestamp", &timestamp),
    ]);

    let response = test_app()
        .oneshot(Request::get(format!("/app?{query}")).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stale_launch_is_rejected() {
    let query = signed_launch_query(&[("shop", STORE), ("timestamp", "1000")]);

    let response = test_app()
        .oneshot(Request::get(format!("/app?{query}")).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Launch the app from the admin and return the session cookie.
async fn launch(app: &Router) -> String {
    let timestamp = now();
    let query = signed_launch_query(&[
        ("host", "YWRtaW4uc2hvcGlmeS5jb20vc3RvcmUvdGVzdA"),
        ("shop", STORE),
        ("timestamp", &timestamp),
    ]);

    let launch = app
        .clone()
        .oneshot(Request::get(format!("/app?{query}")).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert!(launch.status().is_redirection());
    assert_eq!(
        launch.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/app/setup?host=YWRtaW4uc2hvcGlmeS5jb20vc3RvcmUvdGVzdA")
    );
    launch
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string()
}

#[tokio::test]
async fn launch_opens_a_session_for_the_wizard() {
    let app = test_app();
    let cookie = launch(&app).await;

    let response = app
        .oneshot(validate_request(Some(&cookie)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["valid"], true);
    assert_eq!(body["combinationCount"], 6);
}

fn product_request(path: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn product_without_title_is_not_created() {
    let app = test_app();
    let cookie = launch(&app).await;

    let response = app
        .oneshot(product_request(
            "/app/api/products/create",
            &cookie,
            serde_json::json!({ "title": " ", "price": "15.99" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Product title is required");
}

#[tokio::test]
async fn product_update_needs_a_product_id() {
    let app = test_app();
    let cookie = launch(&app).await;

    let response = app
        .oneshot(product_request(
            "/app/api/products/update",
            &cookie,
            serde_json::json!({ "title": "Premium Hoodie" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Product ID is required");
}
