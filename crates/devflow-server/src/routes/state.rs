use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state — workspace summary: state file plus project overviews.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let state = devflow_core::state::State::load(&root)?;
        let projects = devflow_core::project::Project::list(&root)?;

        let summaries: Vec<serde_json::Value> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "name": p.name,
                    "stage": p.stage,
                    "archived": p.archived,
                    "requirements": devflow_core::requirement::summarize(&p.requirements),
                    "updated_at": p.updated_at,
                })
            })
            .collect();

        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "workspace": state.workspace,
            "active_projects": state.active_projects,
            "projects": summaries,
            "generations": state.generations.iter().rev().take(20).collect::<Vec<_>>(),
            "last_updated": state.last_updated,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
