use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use devflow_core::specification::Specification;
use devflow_core::types::{Stage, StageStatus};

/// GET /api/projects/:slug/specification — the stored specification.
pub async fn get_specification(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Specification>, AppError> {
    let root = app.root.clone();
    let spec = tokio::task::spawn_blocking(move || {
        // 404s on the project before the specification so a bad slug
        // doesn't read as "spec not generated yet".
        devflow_core::project::Project::load(&root, &slug)?;
        Specification::load(&root, &slug)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(spec))
}

/// PUT body: any subset of the six section keys; present keys overwrite.
#[derive(serde::Deserialize)]
pub struct PutSpecificationBody {
    #[serde(default)]
    pub functional_requirements: Option<String>,
    #[serde(default)]
    pub non_functional_requirements: Option<String>,
    #[serde(default)]
    pub system_architecture: Option<String>,
    #[serde(default)]
    pub database_schema: Option<String>,
    #[serde(default)]
    pub api_endpoints: Option<String>,
    #[serde(default)]
    pub user_stories: Option<String>,
}

/// PUT /api/projects/:slug/specification — manual upsert of sections.
pub async fn put_specification(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<PutSpecificationBody>,
) -> Result<Json<Specification>, AppError> {
    use devflow_core::sections::Section;

    let root = app.root.clone();
    let spec = tokio::task::spawn_blocking(move || {
        let mut project = devflow_core::project::Project::load(&root, &slug)?;
        let mut spec = match Specification::load(&root, &slug) {
            Ok(spec) => spec,
            Err(devflow_core::DevflowError::SpecificationNotFound(_)) => {
                Specification::new_manual()
            }
            Err(e) => return Err(e),
        };

        let updates = [
            (Section::FunctionalRequirements, body.functional_requirements),
            (
                Section::NonFunctionalRequirements,
                body.non_functional_requirements,
            ),
            (Section::SystemArchitecture, body.system_architecture),
            (Section::DatabaseSchema, body.database_schema),
            (Section::ApiEndpoints, body.api_endpoints),
            (Section::UserStories, body.user_stories),
        ];
        for (section, value) in updates {
            if let Some(text) = value {
                spec.set_section(section, text);
            }
        }

        spec.save(&root, &slug)?;
        if project.progress_for(Stage::Specification).map(|p| p.status)
            == Some(StageStatus::Pending)
        {
            project.mark_stage(Stage::Specification, StageStatus::Draft);
            project.save(&root)?;
        }
        Ok(spec)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(spec))
}
