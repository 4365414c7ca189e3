//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use taskhub_api::{AppState, build_router};
use taskhub_auth::PasswordHasher;
use taskhub_core::config::{AppConfig, StoreBackend};
use taskhub_database::{MemoryTaskStore, MemoryUserStore, Stores, TaskStore, UserStore};
use taskhub_entity::task::{CreateTask, TaskStatus};
use taskhub_entity::user::{CreateUser, UserRole};

/// Password that clears the strength policy.
pub const STRONG_PASSWORD: &str = "violet-anchor-mosaic-tundra-47";

/// Test application backed by in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router
    pub state: AppState,
    /// Direct store access for seeding
    pub stores: Stores,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application
    pub fn with_config(mut config: AppConfig) -> Self {
        config.database.backend = StoreBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let stores = Stores {
            users: Arc::new(MemoryUserStore::new()),
            tasks: Arc::new(MemoryTaskStore::new()),
            pool: None,
        };
        let state = AppState::build(config, stores.clone());
        let router = build_router(state.clone());

        Self {
            router,
            state,
            stores,
        }
    }

    /// Insert an admin directly into the store
    pub async fn create_admin(&self, email: &str, password: &str) -> Uuid {
        let hash = PasswordHasher::new()
            .hash_password(password)
            .expect("Failed to hash password");
        self.stores
            .users
            .create(&CreateUser {
                name: "Admin".to_string(),
                email: email.to_string(),
                password_hash: hash,
                role: UserRole::Admin,
            })
            .await
            .expect("Failed to create admin")
            .id
    }

    /// Register through the API and return the issued token
    pub async fn register(&self, name: &str, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/users/register",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": STRONG_PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        response.body["token"]
            .as_str()
            .expect("No token in register response")
            .to_string()
    }

    /// Login and return `(token, user id)`
    pub async fn login(&self, email: &str, password: &str) -> (String, Uuid) {
        let response = self
            .request(
                "POST",
                "/api/users/login",
                Some(serde_json::json!({"email": email, "password": password})),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        let token = response.body["token"].as_str().unwrap().to_string();
        let id = response.body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, id)
    }

    /// Seed `count` pending tasks
    pub async fn seed_tasks(&self, count: usize) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let task = self
                .stores
                .tasks
                .create(&CreateTask {
                    title: format!("Task {i}"),
                    description: None,
                    status: TaskStatus::Pending,
                })
                .await
                .expect("Failed to seed task");
            ids.push(task.id);
        }
        ids
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = body
            .map(|b| Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap_or_else(Body::empty);
        self.send(method, path, body, token).await
    }

    /// Make a request with a raw body
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Body,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A captured response
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when empty
    pub body: Value,
}
