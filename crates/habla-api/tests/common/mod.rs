#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use habla_api::{
    auth::{Role, jwt::generate_jwt_token},
    config::{ApiConfig, Environment},
    jobs::start_background_jobs,
    lesson::{Lesson, LessonStore, model::seed_lessons},
    router,
    state::ApiState,
};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

/// Test state builder for creating an `ApiState` with in-memory stores
pub struct TestStateBuilder {
    lessons: Vec<Lesson>,
    start_jobs: bool,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            lessons: seed_lessons(),
            start_jobs: true,
        }
    }

    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    pub fn without_jobs(mut self) -> Self {
        self.start_jobs = false;
        self
    }

    pub fn build(self) -> ApiState {
        let config = ApiConfig {
            env: Environment::Development,
            port: 0,
            jwt_secret: JWT_SECRET.to_string(),
            allowed_origins: "http://localhost:3001".to_string(),
            lessons_path: None,
            session_idle_minutes: 120,
        };
        let state = ApiState::with_lessons(&config, LessonStore::new(self.lessons));

        if self.start_jobs {
            // Handles are dropped; the tasks end with the test runtime.
            start_background_jobs(&state);
        }

        state
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A signed-in test user and their bearer token
pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn student() -> Self {
        Self::with_role(Role::Student)
    }

    pub fn admin() -> Self {
        Self::with_role(Role::Admin)
    }

    fn with_role(role: Role) -> Self {
        let user_id = Uuid::new_v4();
        let email = format!("{}@example.com", &user_id.to_string()[..8]);
        let token =
            generate_jwt_token(user_id, &email, role, JWT_SECRET).expect("Failed to create token");
        Self {
            user_id,
            email,
            token,
        }
    }
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(state: ApiState) -> Self {
        Self {
            router: router::router().with_state(state),
        }
    }

    pub fn from_router(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, mut request: Request<Body>) -> TestResponse {
        // Rate limiting falls back to the peer address when no proxy header is set.
        let test_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
        request.extensions_mut().insert(ConnectInfo(test_addr));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "127.0.0.1");
        match token {
            Some(token) => builder.header("authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Send a GET request without credentials
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Self::builder("GET", uri, None)
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn get_with_auth(&self, uri: &str, token: &str) -> TestResponse {
        let request = Self::builder("GET", uri, Some(token))
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn post_with_auth(&self, uri: &str, token: &str) -> TestResponse {
        let request = Self::builder("POST", uri, Some(token))
            .body(Body::empty())
            .expect("Failed to build request");
        self.request(request).await
    }

    pub async fn post_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
    ) -> TestResponse {
        self.json_request("POST", uri, body, Some(token)).await
    }

    pub async fn put_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
    ) -> TestResponse {
        self.json_request("PUT", uri, body, Some(token)).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.json_request("POST", uri, body, None).await
    }

    async fn json_request<T: serde::Serialize>(
        &self,
        method: &str,
        uri: &str,
        body: &T,
        token: Option<&str>,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");
        let request = Self::builder(method, uri, token)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");
        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// The `error` field of a JSON error body
    pub fn error(&self) -> String {
        let value: serde_json::Value = self.json();
        value["error"]
            .as_str()
            .expect("Response has no error message")
            .to_string()
    }
}
