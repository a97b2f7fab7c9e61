use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal devflow workspace inside the given temp directory.
fn init_workspace(dir: &TempDir) {
    devflow_core::workspace::init(dir.path(), "test-workspace").unwrap();
}

/// Point the generator at a mock provider.
fn set_generator_url(dir: &TempDir, url: &str) {
    let mut cfg = devflow_core::config::Config::load(dir.path()).unwrap();
    cfg.generator.base_url = url.to_string();
    cfg.save(dir.path()).unwrap();
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(app, "GET", uri, None).await
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(app, "POST", uri, Some(body)).await
}

/// Create a project named `shop` through the API.
async fn create_shop(app: &axum::Router) {
    let (status, _) = post_json(
        app.clone(),
        "/api/projects",
        serde_json::json!({ "slug": "shop", "name": "Shop API" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Workspace routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn init_route_scaffolds_workspace() {
    let dir = TempDir::new().unwrap();
    let app = devflow_server::build_router(dir.path().to_path_buf());

    let (status, json) = post_json(
        app.clone(),
        "/api/init",
        serde_json::json!({ "name": "fresh" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created"], true);

    let (status, json) = get(app, "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["workspace"], "fresh");
}

#[tokio::test]
async fn get_state_returns_workspace_summary() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = devflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["workspace"], "test-workspace");
    assert!(json["projects"].is_array());
    assert!(json["generations"].is_array());
}

#[tokio::test]
async fn get_config_returns_generator_settings() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let app = devflow_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["workspace"]["name"], "test-workspace");
    assert_eq!(json["generator"]["max_tokens"], 2048);
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_config_errors_when_not_initialized() {
    let dir = TempDir::new().unwrap();
    // Deliberately do NOT init.

    let app = devflow_server::build_router(dir.path().to_path_buf());
    let (status, _json) = get(app, "/api/config").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Project routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_project() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());

    create_shop(&app).await;

    let (status, json) = get(app.clone(), "/api/projects/shop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Shop API");
    assert_eq!(json["stage"], "requirements");
    assert_eq!(json["has_specification"], false);

    let (status, json) = get(app, "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_duplicate_project_conflicts() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());

    create_shop(&app).await;
    let (status, _) = post_json(
        app,
        "/api/projects",
        serde_json::json!({ "slug": "shop", "name": "Again" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_project_rejects_bad_slug() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());

    let (status, _) = post_json(
        app,
        "/api/projects",
        serde_json::json!({ "slug": "Bad Slug", "name": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_missing_project_is_404() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());

    let (status, _) = get(app, "/api/projects/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn advance_is_forward_only() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app.clone(),
        "/api/projects/shop/advance",
        serde_json::json!({ "stage": "specification" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"], "specification");

    let (status, _) = post_json(
        app,
        "/api/projects/shop/advance",
        serde_json::json!({ "stage": "requirements" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Requirement routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn requirement_crud_flow() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app.clone(),
        "/api/projects/shop/requirements",
        serde_json::json!({ "title": "Users can log in", "priority": "must" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "R1");

    let (status, _) = post_json(
        app.clone(),
        "/api/projects/shop/requirements/R1/complete",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get(app.clone(), "/api/projects/shop/requirements").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "1/1 done");

    let (status, _) = request(
        app.clone(),
        "DELETE",
        "/api/projects/shop/requirements/R1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        app,
        "/api/projects/shop/requirements/R1/complete",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_requirement_rejects_bad_priority() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, _) = post_json(
        app,
        "/api/projects/shop/requirements",
        serde_json::json!({ "title": "X", "priority": "urgent" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Specification routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn specification_put_then_get() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = request(
        app.clone(),
        "PUT",
        "/api/projects/shop/specification",
        Some(serde_json::json!({ "functional_requirements": "Login and checkout." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["functional_requirements"], "Login and checkout.");
    assert_eq!(json["source"], "manual");

    let (status, json) = get(app.clone(), "/api/projects/shop/specification").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["functional_requirements"], "Login and checkout.");
    assert_eq!(json["user_stories"], "");

    // The specification stage is now a draft.
    let (_, json) = get(app, "/api/projects/shop").await;
    let progress = json["progress"].as_array().unwrap();
    let spec_stage = progress
        .iter()
        .find(|p| p["stage"] == "specification")
        .unwrap();
    assert_eq!(spec_stage["status"], "draft");
}

#[tokio::test]
async fn specification_get_missing_is_404() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, _) = get(app, "/api/projects/shop/specification").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Record routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn design_crud_flow_sanitizes_mermaid() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app.clone(),
        "/api/projects/shop/designs",
        serde_json::json!({
            "title": "Service layout",
            "kind": "architecture",
            "diagram": "```mermaid\ngraph TD\n  A --> B\n```"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "D1");
    assert_eq!(json["diagram"], "graph TD\n  A --> B");

    let (status, json) = get(app.clone(), "/api/projects/shop/designs/D1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Service layout");

    let (status, _) = request(app.clone(), "DELETE", "/api/projects/shop/designs/D1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(app, "/api/projects/shop/designs/D1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn code_create_strips_fence() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app,
        "/api/projects/shop/code",
        serde_json::json!({
            "language": "rust",
            "content": "```rust\nfn main() {}\n```"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "C1");
    assert_eq!(json["content"], "fn main() {}");
}

#[tokio::test]
async fn record_create_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, _) = post_json(
        app,
        "/api/projects/shop/tests",
        serde_json::json!({ "name": "x", "kind": "fuzz", "content": "y" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Generate routes (mock provider)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_specification_parses_sections() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let mut server = mockito::Server::new_async().await;
    set_generator_url(&dir, &server.url());
    let completion = "## Functional Requirements\nLogin and checkout.\n\n\
                      ## User Stories\nAs a shopper I want to pay.";
    let _mock = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "text": completion }).to_string())
        .create_async()
        .await;

    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app.clone(),
        "/api/projects/shop/specification/generate",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["functional_requirements"],
        "## Functional Requirements\nLogin and checkout."
    );
    assert_eq!(
        json["user_stories"],
        "## User Stories\nAs a shopper I want to pay."
    );
    assert_eq!(json["system_architecture"], "");
    assert_eq!(json["source"], "generated");

    // The call shows up in the generation history.
    let (_, json) = get(app, "/api/state").await;
    let generations = json["generations"].as_array().unwrap();
    assert_eq!(generations.len(), 1);
    assert_eq!(generations[0]["outcome"], "ok");
    assert_eq!(generations[0]["stage"], "specification");
}

#[tokio::test]
async fn generate_specification_provider_failure_is_502() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let mut server = mockito::Server::new_async().await;
    set_generator_url(&dir, &server.url());
    let _mock = server
        .mock("POST", "/v1/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "rate limited"}}"#)
        .create_async()
        .await;

    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, json) = post_json(
        app.clone(),
        "/api/projects/shop/specification/generate",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("rate limited"));

    // The failure is still noted in history.
    let (_, json) = get(app, "/api/state").await;
    let generations = json["generations"].as_array().unwrap();
    assert_eq!(generations.len(), 1);
    assert!(generations[0]["outcome"]
        .as_str()
        .unwrap()
        .contains("rate limited"));
}

#[tokio::test]
async fn generate_design_requires_specification() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    let (status, _) = post_json(
        app,
        "/api/projects/shop/designs/generate",
        serde_json::json!({ "kind": "architecture" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_design_sanitizes_completion() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let mut server = mockito::Server::new_async().await;
    set_generator_url(&dir, &server.url());
    let completion = "Here you go:\n```mermaid\nerDiagram\n  USER ||--o{ ORDER : places\n```";
    let _mock = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .with_body(serde_json::json!({ "text": completion }).to_string())
        .create_async()
        .await;

    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;

    // Seed a specification so the design prompt has context.
    let (status, _) = request(
        app.clone(),
        "PUT",
        "/api/projects/shop/specification",
        Some(serde_json::json!({ "database_schema": "users, orders" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post_json(
        app,
        "/api/projects/shop/designs/generate",
        serde_json::json!({ "kind": "entity_relation" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "D1");
    assert_eq!(json["kind"], "entity_relation");
    assert_eq!(json["diagram"], "erDiagram\n  USER ||--o{ ORDER : places");
}

#[tokio::test]
async fn generate_code_stores_artifact() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let mut server = mockito::Server::new_async().await;
    set_generator_url(&dir, &server.url());
    let _mock = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .with_body(
            serde_json::json!({ "text": "```python\nprint('hi')\n```" }).to_string(),
        )
        .create_async()
        .await;

    let app = devflow_server::build_router(dir.path().to_path_buf());
    create_shop(&app).await;
    let (status, _) = request(
        app.clone(),
        "PUT",
        "/api/projects/shop/specification",
        Some(serde_json::json!({ "functional_requirements": "print hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post_json(
        app,
        "/api/projects/shop/code/generate",
        serde_json::json!({ "language": "python", "framework": "flask" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["language"], "python");
    assert_eq!(json["content"], "print('hi')");
}
