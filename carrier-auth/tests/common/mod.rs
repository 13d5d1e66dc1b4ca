//! Shared setup for the carrier-auth integration tests.
//!
//! Builds the full router over an in-memory credential store and drives it
//! with `tower::ServiceExt::oneshot`; no network or database is involved.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use carrier_auth::{
    build_router,
    config::{
        AuthConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig, SecurityConfig,
        SwaggerConfig, SwaggerMode,
    },
    services::{CredentialStore, MemoryCredentialStore, TokenClaims},
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const API: &str = "/api/v1";
pub const TEST_PASSWORD: &str = "Tr0ub4dor&3";

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "carrier-auth-test".to_string(),
        service_version: "0.0.0-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        api_prefix: API.to_string(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_minutes: 60,
            leeway_seconds: 0,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryCredentialStore>,
    client_ip: String,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        let state = AppState::new(config, store.clone() as Arc<dyn CredentialStore>);
        let router = build_router(state.clone());

        TestApp {
            router,
            state,
            store,
            client_ip: "203.0.113.10".to_string(),
        }
    }

    /// Send a request under the API prefix and return status plus JSON body
    /// (`Value::Null` for an empty or non-JSON body).
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.call_raw(method, &format!("{}{}", API, path), token, body)
            .await
    }

    pub async fn call_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", &self.client_ip);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn register_user(&self, email: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "firstName": "Dana",
                    "lastName": "Okafor",
                    "email": email,
                    "password": TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "user registration failed: {body}");
        body
    }

    pub async fn register_company(&self, work_email: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/company/register",
                None,
                Some(json!({
                    "name": "Acme Freight",
                    "workEmail": work_email,
                    "password": TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "company registration failed: {body}");
        body
    }

    pub async fn register_moderator(&self, email: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/moderator/register",
                None,
                Some(json!({
                    "firstName": "Mo",
                    "lastName": "Reyes",
                    "email": email,
                    "password": TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "moderator registration failed: {body}");
        body
    }

    /// A validly signed token with arbitrary claims.
    pub fn forge_token(&self, sub: &str, principal_type: &str) -> String {
        let claims = TokenClaims {
            sub: sub.to_string(),
            email: "forged@example.com".to_string(),
            principal_type: principal_type.to_string(),
            role: None,
        };
        self.state.jwt.sign(&claims).unwrap()
    }
}

pub fn token_of(body: &Value) -> String {
    body["token"]
        .as_str()
        .expect("response carries a token")
        .to_string()
}

/// Claims of a token signed with the test secret.
pub fn decode_claims(token: &str) -> Value {
    let validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    jsonwebtoken::decode::<Value>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &validation,
    )
    .unwrap()
    .claims
}
