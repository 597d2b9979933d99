use std::time::Duration;

use crate::common::{JWT_SECRET, TestClient, TestStateBuilder, TestUser};
use axum::http::StatusCode;
use habla_api::{
    auth::{AuthEvent, Role, jwt::generate_jwt_token},
    lesson::model::GREETINGS_LESSON_ID,
};
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn test_missing_token_rejected() {
    let client = TestClient::new(TestStateBuilder::new().build());

    let response = client.get("/lessons").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Not authenticated");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let client = TestClient::new(TestStateBuilder::new().build());

    let response = client.get_with_auth("/lessons", "not.a.token").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let forged = generate_jwt_token(
        Uuid::new_v4(),
        "eve@example.com",
        Role::Admin,
        "some_other_secret_that_is_long_enough_too",
    )
    .unwrap();
    let response = client.get_with_auth("/lessons", &forged).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Invalid or expired token");
}

#[tokio::test]
async fn test_auth_me_signs_user_in() {
    let state = TestStateBuilder::new().build();
    let client = TestClient::new(state.clone());
    let user = TestUser::student();

    let response = client.get_with_auth("/auth/me", &user.token).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["user_id"], user.user_id.to_string());
    assert_eq!(body["email"], user.email);
    assert_eq!(body["role"], "student");

    let current = state.auth.current(user.user_id).await.unwrap();
    assert_eq!(current.email, user.email);
}

#[tokio::test]
async fn test_sign_out_publishes_event() {
    let state = TestStateBuilder::new().without_jobs().build();
    let client = TestClient::new(state.clone());
    let user = TestUser::student();
    let mut subscription = state.auth.subscribe();

    let response = client.post_with_auth("/auth/sign-out", &user.token).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "signed_out": true }));

    assert!(matches!(subscription.recv().await, Some(AuthEvent::SignedIn(_))));
    assert!(matches!(
        subscription.recv().await,
        Some(AuthEvent::SignedOut { user_id, .. }) if user_id == user.user_id
    ));
    assert!(state.auth.current(user.user_id).await.is_none());
}

#[tokio::test]
async fn test_sign_out_evicts_sessions() {
    let state = TestStateBuilder::new().build();
    let client = TestClient::new(state.clone());
    let user = TestUser::student();

    let response = client
        .post_with_auth(&format!("/lessons/{GREETINGS_LESSON_ID}/sessions"), &user.token)
        .await;
    response.assert_status(StatusCode::CREATED);
    let session_id = response.json::<Value>()["id"].as_str().unwrap().to_string();
    assert_eq!(state.sessions.count_for_user(user.user_id).await, 1);

    client
        .post_with_auth("/auth/sign-out", &user.token)
        .await
        .assert_status(StatusCode::OK);

    // Eviction runs on a background task.
    let mut remaining = 1;
    for _ in 0..50 {
        remaining = state.sessions.count_for_user(user.user_id).await;
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(remaining, 0, "Sessions should be evicted after sign-out");

    let response = client
        .get_with_auth(&format!("/sessions/{session_id}"), &user.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_started_after_sign_out_survives() {
    let state = TestStateBuilder::new().build();
    let client = TestClient::new(state.clone());
    let user = TestUser::student();

    client
        .post_with_auth("/auth/sign-out", &user.token)
        .await
        .assert_status(StatusCode::OK);

    // Signing back in with the same token and starting right away must not
    // race the eviction of the earlier sign-out.
    let response = client
        .post_with_auth(&format!("/lessons/{GREETINGS_LESSON_ID}/sessions"), &user.token)
        .await;
    response.assert_status(StatusCode::CREATED);
    let session_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = client
        .get_with_auth(&format!("/sessions/{session_id}"), &user.token)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(state.sessions.count_for_user(user.user_id).await, 1);
}

#[tokio::test]
async fn test_student_cannot_create_lessons() {
    let client = TestClient::new(TestStateBuilder::new().build());
    let user = TestUser::student();

    let body = json!({
        "title": "Colors",
        "description": "Basic colors",
        "questions": [{ "question": "Red", "answers": ["rojo"] }]
    });
    let response = client
        .post_json_with_auth("/admin/lessons", &body, &user.token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.error(), "Admin access required");
}

#[test]
fn test_shared_secret_is_long_enough_for_production() {
    assert!(JWT_SECRET.len() >= 32);
}
