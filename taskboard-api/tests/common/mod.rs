//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh `MemoryStore`, so tests
//! never share state and need no database.
//!
//! - `TestContext`: app, store and token service for one test
//! - `seed_user`: inserts a user directly and returns a token for it
//! - `send`: drives one request through the router
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    auth::jwt::TokenService,
    db::{memory::MemoryStore, store::Store},
    models::user::{CreateUser, Role, User},
};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Response of one request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A user and a bearer token for it
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: MemoryStore,
    pub tokens: TokenService,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .expect("test configuration");

        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config);
        let tokens = state.tokens.clone();

        Self {
            app: build_router(state),
            store,
            tokens,
        }
    }

    /// Inserts a user without going through registration
    pub async fn seed_user(&self, fullname: &str, role: Role) -> TestUser {
        let user = self
            .store
            .create_user(CreateUser {
                fullname: fullname.to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
                password_hash: "not-a-real-hash".to_string(),
                role,
            })
            .await
            .expect("seed user");

        let token = self.tokens.issue(user.id).expect("issue token");
        TestUser { user, token }
    }

    pub async fn admin(&self) -> TestUser {
        self.seed_user("Admin User", Role::Admin).await
    }

    pub async fn member(&self, fullname: &str) -> TestUser {
        self.seed_user(fullname, Role::User).await
    }

    /// Sends a request and decodes the JSON body (`Value::Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a project through the API and returns its id
    pub async fn create_project(&self, admin: &TestUser, title: &str) -> String {
        let response = self
            .post(
                "/projects",
                &admin.token,
                json!({ "title": title, "description": format!("{} description", title) }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["project"]["id"]
            .as_str()
            .expect("project id")
            .to_string()
    }

    /// Creates a task through the API and returns it
    pub async fn create_task(
        &self,
        admin: &TestUser,
        project_id: &str,
        assignee: &TestUser,
        title: &str,
        priority: &str,
    ) -> Value {
        let response = self
            .post(
                "/task",
                &admin.token,
                json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "assignedTo": assignee.id(),
                    "projectId": project_id,
                    "priority": priority,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["task"].clone()
    }
}
