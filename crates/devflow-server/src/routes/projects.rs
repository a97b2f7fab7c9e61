use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects — list all projects.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let projects = devflow_core::project::Project::list(&root)?;
        let list: Vec<serde_json::Value> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "name": p.name,
                    "description": p.description,
                    "stage": p.stage,
                    "archived": p.archived,
                    "requirements": devflow_core::requirement::summarize(&p.requirements),
                    "updated_at": p.updated_at,
                })
            })
            .collect();
        Ok::<_, devflow_core::DevflowError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects/:slug — full project detail.
pub async fn get_project(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let p = devflow_core::project::Project::load(&root, &slug)?;
        let has_spec = devflow_core::specification::Specification::exists(&root, &slug);
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "slug": p.slug,
            "name": p.name,
            "description": p.description,
            "stage": p.stage,
            "archived": p.archived,
            "requirements": p.requirements,
            "progress": p.progress,
            "has_specification": has_spec,
            "created_at": p.created_at,
            "updated_at": p.updated_at,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateProjectBody {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/projects — create a new project.
pub async fn create_project(
    State(app): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut p = devflow_core::project::Project::create(&root, body.slug, body.name)?;
        if let Some(desc) = body.description {
            p.description = Some(desc);
            p.save(&root)?;
        }

        // Track as active in the workspace state.
        if let Ok(mut state) = devflow_core::state::State::load(&root) {
            state.add_active_project(&p.slug);
            let _ = state.save(&root);
        }

        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "slug": p.slug,
            "name": p.name,
            "stage": p.stage,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AdvanceBody {
    pub stage: String,
}

/// POST /api/projects/:slug/advance — move a project to a later stage.
pub async fn advance_project(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<AdvanceBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = devflow_core::config::Config::load(&root)?;
        let mut p = devflow_core::project::Project::load(&root, &slug)?;
        let target: devflow_core::types::Stage = body.stage.parse()?;

        p.advance(target, &config)?;
        p.save(&root)?;

        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "slug": p.slug,
            "stage": p.stage,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
