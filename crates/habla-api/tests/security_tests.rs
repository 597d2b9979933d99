use crate::common::{TestClient, TestStateBuilder};
use axum::{Router, http::StatusCode, middleware};
use habla_api::{
    config::Environment,
    middleware::{REQUEST_ID_HEADER, apply_security_headers, request_id_middleware},
    router,
};

fn full_app(environment: Environment) -> Router {
    let app = router::router()
        .with_state(TestStateBuilder::new().build())
        .layer(middleware::from_fn(request_id_middleware));
    apply_security_headers(app, environment)
}

#[tokio::test]
async fn test_health() {
    let client = TestClient::new(TestStateBuilder::new().build());

    let response = client.get("/health").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let client = TestClient::new(TestStateBuilder::new().build());

    let response = client.get("/v1/courses").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "No route for /v1/courses");
}

#[tokio::test]
async fn test_error_responses_carry_security_headers() {
    let client = TestClient::from_router(full_app(Environment::Production));

    let response = client.get("/lessons").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers.get("strict-transport-security").is_some());
    assert!(response.headers.get(REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_tampered_token_payload_rejected() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let user = crate::common::TestUser::student();

    // Swap the payload for one claiming the admin role, keeping the signature.
    let mut parts: Vec<&str> = user.token.split('.').collect();
    let admin = crate::common::TestUser::admin();
    let admin_payload = admin.token.split('.').nth(1).unwrap();
    parts[1] = admin_payload;
    let tampered = parts.join(".");

    let response = client.get_with_auth("/auth/me", &tampered).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
