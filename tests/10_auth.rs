mod common;

use anyhow::Result;
use axum::{body::Body, http::Request, http::StatusCode};
use common::{error_message, TestApp, ADMIN_ROLE};
use product_catalog_api::auth::IdentityCodec;
use serde_json::json;

#[tokio::test]
async fn missing_token_is_a_bad_request() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/v1/getProducts", None, json!({})).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&res.body), "token not found");
    Ok(())
}

#[tokio::test]
async fn token_signed_with_another_key_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let foreign = IdentityCodec::new("someone-elses-key", 1);
    let claims = json!({
        "id": "user-1", "uid": "federated-1", "username": "jdoe",
        "email": "jdoe@example.com", "name": "Jane Doe", "roles": [ADMIN_ROLE],
    });
    let token = foreign.encode(claims.as_object().cloned().unwrap_or_default())?;

    let res = app.post("/v1/getProducts", Some(&token), json!({})).await?;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&res.body), "invalid token");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/v1/getProducts", Some("not.a.jwt"), json!({})).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn blank_identity_field_is_forbidden() -> Result<()> {
    let app = TestApp::new();
    let claims = json!({
        "id": "user-1", "uid": "", "username": "jdoe",
        "email": "jdoe@example.com", "name": "Jane Doe", "roles": [],
    });
    let token = app.codec.encode(claims.as_object().cloned().unwrap_or_default())?;

    let res = app.post("/v1/getProducts", Some(&token), json!({})).await?;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&res.body), "user Federated ID is required");
    Ok(())
}

#[tokio::test]
async fn missing_request_id_does_not_block() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/getProducts")
        .header("authorization", format!("Bearer {}", app.reader_token()))
        .body(Body::from("{}"))?;

    let res = app.send(request).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["totalItems"], 0);
    Ok(())
}

#[tokio::test]
async fn bearer_prefix_is_optional() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/getProducts")
        .header("authorization", app.reader_token())
        .body(Body::from("{}"))?;

    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn writes_require_the_admin_role() -> Result<()> {
    let app = TestApp::new();
    let body = json!({"name": "Widget", "color": "123"});

    let res = app.post("/v1/saveProduct", Some(&app.reader_token()), body.clone()).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&res.body), "admin access required");
    assert!(app.store.is_empty().await);

    let res = app.post("/v1/saveProduct", Some(&app.admin_token()), body).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(app.store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn reads_do_not_require_the_admin_role() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .post("/v1/getProductsByPartialName", Some(&app.reader_token()), json!({"name": "w"}))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
    Ok(())
}

#[tokio::test]
async fn public_routes_need_no_token() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/ping").await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/health").await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.post("/getBuildInfo", None, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "product-catalog-api");
    Ok(())
}

#[tokio::test]
async fn cookie_source_reads_the_named_cookie() -> Result<()> {
    let app = TestApp::with(&[("AUTH_TOKEN_SOURCE", "cookie")], Vec::new());
    let request = Request::builder()
        .method("POST")
        .uri("/v1/getProducts")
        .header("cookie", format!("theme=dark; ecommerce_token={}", app.reader_token()))
        .body(Body::from("{}"))?;

    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.post("/v1/getProducts", Some(&app.reader_token()), json!({})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}
