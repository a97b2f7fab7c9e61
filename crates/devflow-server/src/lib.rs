pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Workspace
        .route("/api/init", post(routes::init::init_workspace))
        .route("/api/state", get(routes::state::get_state))
        .route("/api/config", get(routes::config::get_config))
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/{slug}", get(routes::projects::get_project))
        .route(
            "/api/projects/{slug}/advance",
            post(routes::projects::advance_project),
        )
        // Requirements
        .route(
            "/api/projects/{slug}/requirements",
            get(routes::requirements::list_requirements),
        )
        .route(
            "/api/projects/{slug}/requirements",
            post(routes::requirements::add_requirement),
        )
        .route(
            "/api/projects/{slug}/requirements/{id}/complete",
            post(routes::requirements::complete_requirement),
        )
        .route(
            "/api/projects/{slug}/requirements/{id}",
            delete(routes::requirements::remove_requirement),
        )
        // Specification
        .route(
            "/api/projects/{slug}/specification",
            get(routes::specification::get_specification),
        )
        .route(
            "/api/projects/{slug}/specification",
            put(routes::specification::put_specification),
        )
        .route(
            "/api/projects/{slug}/specification/generate",
            post(routes::generate::generate_specification),
        )
        // Designs
        .route(
            "/api/projects/{slug}/designs",
            get(routes::records::list_designs),
        )
        .route(
            "/api/projects/{slug}/designs",
            post(routes::records::create_design),
        )
        .route(
            "/api/projects/{slug}/designs/generate",
            post(routes::generate::generate_design),
        )
        .route(
            "/api/projects/{slug}/designs/{id}",
            get(routes::records::get_design),
        )
        .route(
            "/api/projects/{slug}/designs/{id}",
            delete(routes::records::delete_design),
        )
        // Code artifacts
        .route("/api/projects/{slug}/code", get(routes::records::list_code))
        .route(
            "/api/projects/{slug}/code",
            post(routes::records::create_code),
        )
        .route(
            "/api/projects/{slug}/code/generate",
            post(routes::generate::generate_code),
        )
        .route(
            "/api/projects/{slug}/code/{id}",
            get(routes::records::get_code),
        )
        .route(
            "/api/projects/{slug}/code/{id}",
            delete(routes::records::delete_code),
        )
        // Test artifacts
        .route(
            "/api/projects/{slug}/tests",
            get(routes::records::list_tests),
        )
        .route(
            "/api/projects/{slug}/tests",
            post(routes::records::create_test),
        )
        .route(
            "/api/projects/{slug}/tests/generate",
            post(routes::generate::generate_tests),
        )
        .route(
            "/api/projects/{slug}/tests/{id}",
            get(routes::records::get_test),
        )
        .route(
            "/api/projects/{slug}/tests/{id}",
            delete(routes::records::delete_test),
        )
        // Doc artifacts
        .route("/api/projects/{slug}/docs", get(routes::records::list_docs))
        .route(
            "/api/projects/{slug}/docs",
            post(routes::records::create_doc),
        )
        .route(
            "/api/projects/{slug}/docs/generate",
            post(routes::generate::generate_docs),
        )
        .route(
            "/api/projects/{slug}/docs/{id}",
            get(routes::records::get_doc),
        )
        .route(
            "/api/projects/{slug}/docs/{id}",
            delete(routes::records::delete_doc),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the devflow API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the devflow API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so
/// the caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("devflow API server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
