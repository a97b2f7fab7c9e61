//! CRUD for the four stage record collections. The shapes differ per
//! collection, so each gets its own handler set; persistence is shared in
//! `devflow_core::record`.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use devflow_core::project::Project;
use devflow_core::record::{CodeArtifact, Design, DocArtifact, TestArtifact};
use devflow_core::types::{Stage, StageStatus};

fn join_err(e: tokio::task::JoinError) -> AppError {
    AppError(anyhow::anyhow!("task join error: {e}"))
}

/// Mark a stage Draft the first time a record lands in it.
fn touch_stage(root: &std::path::Path, project: &mut Project, stage: Stage) {
    if project.progress_for(stage).map(|p| p.status) == Some(StageStatus::Pending) {
        project.mark_stage(stage, StageStatus::Draft);
        let _ = project.save(root);
    }
}

// ---------------------------------------------------------------------------
// Designs
// ---------------------------------------------------------------------------

/// GET /api/projects/:slug/designs
pub async fn list_designs(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Design>>, AppError> {
    let root = app.root.clone();
    let all = tokio::task::spawn_blocking(move || {
        Project::load(&root, &slug)?;
        Design::list(&root, &slug)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(all))
}

#[derive(serde::Deserialize)]
pub struct CreateDesignBody {
    pub title: String,
    pub kind: String,
    pub diagram: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /api/projects/:slug/designs
pub async fn create_design(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateDesignBody>,
) -> Result<Json<Design>, AppError> {
    let root = app.root.clone();
    let design = tokio::task::spawn_blocking(move || {
        let kind: devflow_core::types::DesignKind = body.kind.parse()?;
        let mut project = Project::load(&root, &slug)?;
        let design = Design::create(&root, &mut project, body.title, kind, &body.diagram, body.notes)?;
        touch_stage(&root, &mut project, Stage::Design);
        Ok::<_, devflow_core::DevflowError>(design)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(design))
}

/// GET /api/projects/:slug/designs/:id
pub async fn get_design(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Design>, AppError> {
    let root = app.root.clone();
    let design = tokio::task::spawn_blocking(move || Design::load(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(design))
}

/// DELETE /api/projects/:slug/designs/:id
pub async fn delete_design(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let id_out = id.clone();
    tokio::task::spawn_blocking(move || Design::delete(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(serde_json::json!({ "id": id_out, "removed": true })))
}

// ---------------------------------------------------------------------------
// Code artifacts
// ---------------------------------------------------------------------------

/// GET /api/projects/:slug/code
pub async fn list_code(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CodeArtifact>>, AppError> {
    let root = app.root.clone();
    let all = tokio::task::spawn_blocking(move || {
        Project::load(&root, &slug)?;
        CodeArtifact::list(&root, &slug)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(all))
}

#[derive(serde::Deserialize)]
pub struct CreateCodeBody {
    pub language: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
}

/// POST /api/projects/:slug/code
pub async fn create_code(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateCodeBody>,
) -> Result<Json<CodeArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || {
        let mut project = Project::load(&root, &slug)?;
        let artifact = CodeArtifact::create(
            &root,
            &mut project,
            body.language,
            body.framework,
            body.description,
            &body.content,
        )?;
        touch_stage(&root, &mut project, Stage::Code);
        Ok::<_, devflow_core::DevflowError>(artifact)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(artifact))
}

/// GET /api/projects/:slug/code/:id
pub async fn get_code(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<CodeArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || CodeArtifact::load(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(artifact))
}

/// DELETE /api/projects/:slug/code/:id
pub async fn delete_code(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let id_out = id.clone();
    tokio::task::spawn_blocking(move || CodeArtifact::delete(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(serde_json::json!({ "id": id_out, "removed": true })))
}

// ---------------------------------------------------------------------------
// Test artifacts
// ---------------------------------------------------------------------------

/// GET /api/projects/:slug/tests
pub async fn list_tests(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<TestArtifact>>, AppError> {
    let root = app.root.clone();
    let all = tokio::task::spawn_blocking(move || {
        Project::load(&root, &slug)?;
        TestArtifact::list(&root, &slug)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(all))
}

#[derive(serde::Deserialize)]
pub struct CreateTestBody {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub framework: Option<String>,
    pub content: String,
}

/// POST /api/projects/:slug/tests
pub async fn create_test(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateTestBody>,
) -> Result<Json<TestArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || {
        let kind: devflow_core::types::TestKind = body.kind.parse()?;
        let mut project = Project::load(&root, &slug)?;
        let artifact = TestArtifact::create(
            &root,
            &mut project,
            body.name,
            kind,
            body.framework,
            &body.content,
        )?;
        touch_stage(&root, &mut project, Stage::Testing);
        Ok::<_, devflow_core::DevflowError>(artifact)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(artifact))
}

/// GET /api/projects/:slug/tests/:id
pub async fn get_test(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<TestArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || TestArtifact::load(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(artifact))
}

/// DELETE /api/projects/:slug/tests/:id
pub async fn delete_test(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let id_out = id.clone();
    tokio::task::spawn_blocking(move || TestArtifact::delete(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(serde_json::json!({ "id": id_out, "removed": true })))
}

// ---------------------------------------------------------------------------
// Doc artifacts
// ---------------------------------------------------------------------------

/// GET /api/projects/:slug/docs
pub async fn list_docs(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<DocArtifact>>, AppError> {
    let root = app.root.clone();
    let all = tokio::task::spawn_blocking(move || {
        Project::load(&root, &slug)?;
        DocArtifact::list(&root, &slug)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(all))
}

#[derive(serde::Deserialize)]
pub struct CreateDocBody {
    pub kind: String,
    pub title: String,
    pub content: String,
}

/// POST /api/projects/:slug/docs
pub async fn create_doc(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateDocBody>,
) -> Result<Json<DocArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || {
        let kind: devflow_core::types::DocKind = body.kind.parse()?;
        let mut project = Project::load(&root, &slug)?;
        let artifact = DocArtifact::create(&root, &mut project, kind, body.title, &body.content)?;
        touch_stage(&root, &mut project, Stage::Documentation);
        Ok::<_, devflow_core::DevflowError>(artifact)
    })
    .await
    .map_err(join_err)??;
    Ok(Json(artifact))
}

/// GET /api/projects/:slug/docs/:id
pub async fn get_doc(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<DocArtifact>, AppError> {
    let root = app.root.clone();
    let artifact = tokio::task::spawn_blocking(move || DocArtifact::load(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(artifact))
}

/// DELETE /api/projects/:slug/docs/:id
pub async fn delete_doc(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let id_out = id.clone();
    tokio::task::spawn_blocking(move || DocArtifact::delete(&root, &slug, &id))
        .await
        .map_err(join_err)??;
    Ok(Json(serde_json::json!({ "id": id_out, "removed": true })))
}
