use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config — the workspace configuration plus validation warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let cfg = devflow_core::config::Config::load(&root)?;
        let warnings = cfg.validate();
        Ok::<_, devflow_core::DevflowError>(serde_json::json!({
            "version": cfg.version,
            "workspace": cfg.workspace,
            "generator": cfg.generator,
            "stages": cfg.stages,
            "warnings": warnings,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
