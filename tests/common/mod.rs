#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use product_catalog_api::{
    app::app,
    auth::IdentityCodec,
    config::AppConfig,
    database::{InMemoryProductRepository, Product},
    state::AppState,
};

pub const SIGNING_KEY: &str = "integration-signing-key";
pub const ADMIN_ROLE: &str = "catalog-admin";

pub struct TestApp {
    pub router: Router,
    pub codec: IdentityCodec,
    pub store: Arc<InMemoryProductRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: Vec<(String, String)> = vec![
        ("JWT_SIGNING_KEY".into(), SIGNING_KEY.into()),
        ("DATABASE_URL".into(), "postgres://unused@localhost/unused".into()),
        ("AUTH_ADMIN_ROLE".into(), ADMIN_ROLE.into()),
    ];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    AppConfig::from_lookup(move |key| {
        vars.iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test configuration")
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(&[], Vec::new())
    }

    pub fn seeded(products: Vec<Product>) -> Self {
        Self::with(&[], products)
    }

    pub fn with(env: &[(&str, &str)], products: Vec<Product>) -> Self {
        let config = config(env);
        let store = Arc::new(InMemoryProductRepository::with_products(products));
        let state = AppState::new(&config, store.clone());
        Self {
            router: app(state),
            codec: IdentityCodec::from_config(&config.jwt),
            store,
        }
    }

    pub fn token(&self, roles: &[&str]) -> String {
        let claims = json!({
            "id": "user-1",
            "uid": "federated-1",
            "username": "jdoe",
            "email": "jdoe@example.com",
            "name": "Jane Doe",
            "roles": roles,
        });
        self.codec
            .encode(claims.as_object().cloned().unwrap_or_default())
            .expect("token")
    }

    pub fn admin_token(&self) -> String {
        self.token(&[ADMIN_ROLE])
    }

    pub fn reader_token(&self) -> String {
        self.token(&["catalog-reader"])
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse { status, body })
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.post_raw(path, token, body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, token: Option<&str>, body: impl Into<Body>) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .header("request-id", "test-correlation");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(body.into())?).await
    }

    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        self.send(Request::builder().uri(path).body(Body::empty())?).await
    }
}

pub fn product(id: &str, name: &str, description: &str, color: &str) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        color: color.into(),
    }
}

pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
