use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::signup::SignupService;
use service::storage::JsonFileStore;
use tower::Service;
use uuid::Uuid;

use server::startup::build_app;

fn store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("beta_signup_api_{}", Uuid::new_v4()))
        .join("beta-signups.json")
}

fn app_at(path: &PathBuf) -> Router {
    let store = Arc::new(JsonFileStore::new(path.clone()));
    build_app(Arc::new(SignupService::new(store)))
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn post_json(body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/api/beta-signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

fn post_raw(content_type: &str, body: impl Into<Body>) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/api/beta-signup")
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())?)
}

async fn count(app: &Router) -> anyhow::Result<u64> {
    let req = Request::builder().uri("/api/beta-count").body(Body::empty())?;
    let (status, body) = send(app, req).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["count"].as_u64().unwrap_or(u64::MAX))
}

async fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

#[tokio::test]
async fn signup_then_duplicate_in_other_case() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let (status, body) = send(&app, post_json(json!({"name": "Ann", "email": "ann@x.com"}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Thank you for signing up! We'll keep you updated."}));

    let (status, body) = send(&app, post_json(json!({"name": "Ann", "email": "ANN@X.COM "}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "This email is already registered for the beta"}));

    assert_eq!(count(&app).await?, 1);
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn missing_fields_and_bad_email_are_rejected() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    for body in [json!({}), json!({"name": "Ann"}), json!({"email": "ann@x.com"}), json!({"name": "  ", "email": "ann@x.com"})] {
        let (status, reply) = send(&app, post_json(body)?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["success"], false);
        assert_eq!(reply["message"], "Name and email are required");
    }

    for email in ["ann", "ann@x", "ann @x.com", "@x.com", "ann@x."] {
        let (status, reply) = send(&app, post_json(json!({"name": "Ann", "email": email}))?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["message"], "Please enter a valid email address");
    }

    assert_eq!(count(&app).await?, 0);
    assert!(!path.exists());
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn form_encoded_submission_is_accepted() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let req = post_raw(
        "application/x-www-form-urlencoded",
        "name=Bo+Li&email=Bo%40Example.com&company=Acme&monthlyOrders=500",
    )?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let stored: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(stored[0]["name"], "Bo Li");
    assert_eq!(stored[0]["email"], "bo@example.com");
    assert_eq!(stored[0]["company"], "Acme");
    assert_eq!(stored[0]["monthlyOrders"], "500");
    assert_eq!(stored[0]["platform"], "");
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn multipart_submission_ignores_file_parts() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let boundary = "X-BETA-BOUNDARY";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nCy\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\ncy@x.com\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\nPNG\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let req = post_raw(&format!("multipart/form-data; boundary={boundary}"), body)?;
    let (status, reply) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["success"], true);
    assert_eq!(count(&app).await?, 1);
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_generic_500() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let (status, body) = send(&app, post_raw("application/json", "{\"name\": \"Ann\",")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "An error occurred. Please try again."}));

    let (status, body) = send(&app, post_raw("application/json", "null")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An error occurred. Please try again.");
    assert_eq!(count(&app).await?, 0);
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn count_follows_distinct_signups() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);
    assert_eq!(count(&app).await?, 0);

    for i in 0..4 {
        let (status, _) = send(&app, post_json(json!({"name": "N", "email": format!("n{i}@x.com")}))?).await?;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(count(&app).await?, 4);

    // a fresh app over the same file sees the same list
    assert_eq!(count(&app_at(&path)).await?, 4);
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn unreadable_store_fails_submit_but_counts_zero() -> anyhow::Result<()> {
    // a directory where the file should be
    let path = store_path();
    tokio::fs::create_dir_all(&path).await?;
    let app = app_at(&path);

    let (status, body) = send(&app, post_json(json!({"name": "Ann", "email": "ann@x.com"}))?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An error occurred. Please try again.");
    assert_eq!(count(&app).await?, 0);
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn wrong_method_and_preflight() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let req = Request::builder().method("GET").uri("/api/beta-signup").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/beta-signup")
        .header(header::ORIGIN, "https://landing.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn health_and_metrics() -> anyhow::Result<()> {
    let path = store_path();
    let app = app_at(&path);

    let (status, body) = send(&app, Request::builder().uri("/health").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    send(&app, post_json(json!({"name": "M", "email": "m@x.com"}))?).await?;
    let resp = app.clone().call(Request::builder().uri("/metrics").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(axum::body::to_bytes(resp.into_body(), usize::MAX).await?.to_vec())?;
    assert!(text.contains("beta_signup_accepted_total"));
    cleanup(&path).await;
    Ok(())
}
