//! API client for integration testing.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`, no
//! listener involved.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use meibo_core::common::auth::{AdminAllowList, GateDeps, IdentityResolver, JwtIdentityResolver};
use meibo_core::common::fiscal_year::FiscalYear;
use meibo_core::domains::auth::JwtService;
use meibo_core::kernel::{PgMemberDirectory, TimedDirectory};
use meibo_core::server::{build_router, AppState};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_SECRET: &str = "test_secret_key";
const TEST_ISSUER: &str = "test_issuer";

pub struct ApiClient {
    router: Router,
    jwt_service: JwtService,
    token: Option<String>,
}

/// Status and decoded JSON body of one response
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Error code of a failure envelope
    pub fn key(&self) -> &str {
        self.body["key"].as_str().unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        self.body["success"] == Value::Bool(true)
    }
}

impl ApiClient {
    pub fn new(pool: PgPool, init_admins: &str) -> Self {
        let directory = Arc::new(TimedDirectory::new(
            Arc::new(PgMemberDirectory::new(pool.clone())),
            Duration::from_secs(3),
        ));
        let deps = GateDeps::new(
            directory,
            AdminAllowList::from_csv(init_admins),
            FiscalYear::new(9).expect("valid offset"),
        );

        let identity_resolver: Arc<dyn IdentityResolver> = Arc::new(JwtIdentityResolver::new(
            JwtService::new(TEST_SECRET, TEST_ISSUER.to_string()),
        ));

        Self {
            router: build_router(AppState::new(pool, deps), identity_resolver, &[]),
            jwt_service: JwtService::new(TEST_SECRET, TEST_ISSUER.to_string()),
            token: None,
        }
    }

    /// Send subsequent requests as `uid`
    pub fn as_user(mut self, uid: &str, email: Option<&str>) -> Self {
        let token = self
            .jwt_service
            .create_token(uid, email.map(String::from))
            .expect("Failed to create token");
        self.token = Some(token);
        self
    }

    pub async fn get(&self, uri: &str) -> ApiResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> ApiResponse {
        self.send(Method::POST, uri, body).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> ApiResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Option<Value>) -> ApiResponse {
        self.send(Method::DELETE, uri, body).await
    }

    /// GET with an explicit header instead of the client's token
    pub async fn get_with_header(&self, uri: &str, name: &str, value: &str) -> ApiResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(name, value)
            .body(Body::empty())
            .expect("Failed to build request");
        self.dispatch(request).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> ApiResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        ApiResponse { status, body }
    }
}
