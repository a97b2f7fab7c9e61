use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct InitBody {
    pub name: String,
}

/// POST /api/init — scaffold the `.devflow/` workspace.
pub async fn init_workspace(
    State(app): State<AppState>,
    Json(body): Json<InitBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let created = devflow_core::workspace::init(&root, &body.name)?;
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "name": body.name,
            "created": created,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
