use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects/:slug/requirements — list a project's requirements.
pub async fn list_requirements(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = devflow_core::project::Project::load(&root, &slug)?;
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "requirements": p.requirements,
            "summary": devflow_core::requirement::summarize(&p.requirements),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AddRequirementBody {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    "should".to_string()
}

/// POST /api/projects/:slug/requirements — add a requirement.
pub async fn add_requirement(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<AddRequirementBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let priority: devflow_core::types::Priority = body.priority.parse()?;
        let mut p = devflow_core::project::Project::load(&root, &slug)?;
        let id = p.add_requirement(body.title, priority);
        if let Some(detail) = body.detail {
            if let Some(req) = p.requirements.iter_mut().find(|r| r.id == id) {
                req.detail = Some(detail);
            }
        }
        p.save(&root)?;
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({ "id": id }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/projects/:slug/requirements/:id/complete — mark done.
pub async fn complete_requirement(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = devflow_core::project::Project::load(&root, &slug)?;
        p.complete_requirement(&id)?;
        p.save(&root)?;
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({ "id": id, "status": "done" }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/projects/:slug/requirements/:id — remove a requirement.
pub async fn remove_requirement(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = devflow_core::project::Project::load(&root, &slug)?;
        p.remove_requirement(&id)?;
        p.save(&root)?;
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({ "id": id, "removed": true }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
