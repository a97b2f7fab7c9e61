//! Generation routes: one completion round trip per request, then pure
//! post-processing (section parser, Mermaid sanitizer, fence stripper)
//! and a record write. Provider failures surface as 502 after being noted
//! in the generation history.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use completion_agent::{CompletionError, CompletionRequest};
use devflow_core::config::Config;
use devflow_core::project::Project;
use devflow_core::record::{CodeArtifact, Design, DocArtifact, TestArtifact};
use devflow_core::specification::Specification;
use devflow_core::types::{Stage, StageStatus};
use devflow_core::{prompts, DevflowError};
use std::path::{Path as FsPath, PathBuf};

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

async fn load_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DevflowError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .map_err(Into::into)
}

async fn call_provider(config: &Config, prompt: String) -> Result<String, CompletionError> {
    let client = completion_agent::client_from_env(&config.generator.base_url);
    let request = CompletionRequest {
        model: config.generator.model.clone(),
        prompt,
        max_tokens: config.generator.max_tokens,
        temperature: config.generator.temperature,
    };
    Ok(client.complete(&request).await?.text)
}

/// Append to the generation history; history failures never fail the
/// request that triggered them.
fn note_generation(root: &FsPath, slug: &str, stage: Stage, model: &str, outcome: &str) {
    if let Ok(mut state) = devflow_core::state::State::load(root) {
        state.record_generation(slug, stage, model, outcome);
        let _ = state.save(root);
    }
}

fn mark_draft(root: &FsPath, project: &mut Project, stage: Stage) -> Result<(), DevflowError> {
    if project.progress_for(stage).map(|p| p.status) == Some(StageStatus::Pending) {
        project.mark_stage(stage, StageStatus::Draft);
        project.save(root)?;
    }
    Ok(())
}

/// Run the completion call, noting the outcome either way.
async fn generate_text(
    root: &PathBuf,
    slug: &str,
    stage: Stage,
    config: &Config,
    prompt: String,
) -> Result<String, AppError> {
    let model = config.generator.model.clone();
    match call_provider(config, prompt).await {
        Ok(text) => {
            tracing::info!(%slug, %stage, chars = text.len(), "generation succeeded");
            let root = root.clone();
            let slug = slug.to_string();
            tokio::task::spawn_blocking(move || {
                note_generation(&root, &slug, stage, &model, "ok");
            })
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
            Ok(text)
        }
        Err(err) => {
            tracing::warn!(%slug, %stage, error = %err, "generation failed");
            let root = root.clone();
            let slug = slug.to_string();
            let outcome = err.to_string();
            tokio::task::spawn_blocking(move || {
                note_generation(&root, &slug, stage, &model, &outcome);
            })
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
            Err(AppError(err.into()))
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/projects/:slug/specification/generate
// ---------------------------------------------------------------------------

pub async fn generate_specification(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Specification>, AppError> {
    let root = app.root.clone();
    let (config, prompt) = {
        let root = root.clone();
        let slug = slug.clone();
        load_blocking(move || {
            let config = Config::load(&root)?;
            let project = Project::load(&root, &slug)?;
            let prompt = prompts::specification_prompt(&project);
            Ok((config, prompt))
        })
        .await?
    };

    let text = generate_text(&root, &slug, Stage::Specification, &config, prompt).await?;

    let model = config.generator.model.clone();
    let spec = load_blocking(move || {
        let parsed = devflow_core::sections::parse_sections(&text);
        let spec = Specification::from_parsed(&parsed, Some(model), text.chars().count());
        spec.save(&root, &slug)?;

        let mut project = Project::load(&root, &slug)?;
        mark_draft(&root, &mut project, Stage::Specification)?;
        Ok(spec)
    })
    .await?;

    Ok(Json(spec))
}

// ---------------------------------------------------------------------------
// POST /api/projects/:slug/designs/generate
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct GenerateDesignBody {
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

pub async fn generate_design(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<GenerateDesignBody>,
) -> Result<Json<Design>, AppError> {
    let kind: devflow_core::types::DesignKind =
        body.kind.parse().map_err(|e: DevflowError| AppError(e.into()))?;

    let root = app.root.clone();
    let (config, prompt) = {
        let root = root.clone();
        let slug = slug.clone();
        load_blocking(move || {
            let config = Config::load(&root)?;
            let project = Project::load(&root, &slug)?;
            let spec = Specification::load(&root, &slug)?;
            let prompt = prompts::design_prompt(&project, &spec, kind);
            Ok((config, prompt))
        })
        .await?
    };

    let text = generate_text(&root, &slug, Stage::Design, &config, prompt).await?;

    let title = body.title.unwrap_or_else(|| format!("{kind} diagram"));
    let design = load_blocking(move || {
        let mut project = Project::load(&root, &slug)?;
        let design = Design::create(&root, &mut project, title, kind, &text, None)?;
        mark_draft(&root, &mut project, Stage::Design)?;
        Ok(design)
    })
    .await?;

    Ok(Json(design))
}

// ---------------------------------------------------------------------------
// POST /api/projects/:slug/code/generate
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct GenerateCodeBody {
    pub language: String,
    #[serde(default)]
    pub framework: Option<String>,
}

pub async fn generate_code(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<GenerateCodeBody>,
) -> Result<Json<CodeArtifact>, AppError> {
    let root = app.root.clone();
    let (config, prompt) = {
        let root = root.clone();
        let slug = slug.clone();
        let language = body.language.clone();
        let framework = body.framework.clone();
        load_blocking(move || {
            let config = Config::load(&root)?;
            let project = Project::load(&root, &slug)?;
            let spec = Specification::load(&root, &slug)?;
            let prompt = prompts::code_prompt(&project, &spec, &language, framework.as_deref());
            Ok((config, prompt))
        })
        .await?
    };

    let text = generate_text(&root, &slug, Stage::Code, &config, prompt).await?;

    let artifact = load_blocking(move || {
        let mut project = Project::load(&root, &slug)?;
        let artifact = CodeArtifact::create(
            &root,
            &mut project,
            body.language,
            body.framework,
            Some("generated".to_string()),
            &text,
        )?;
        mark_draft(&root, &mut project, Stage::Code)?;
        Ok(artifact)
    })
    .await?;

    Ok(Json(artifact))
}

// ---------------------------------------------------------------------------
// POST /api/projects/:slug/tests/generate
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct GenerateTestsBody {
    pub kind: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn generate_tests(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<GenerateTestsBody>,
) -> Result<Json<TestArtifact>, AppError> {
    let kind: devflow_core::types::TestKind =
        body.kind.parse().map_err(|e: DevflowError| AppError(e.into()))?;

    let root = app.root.clone();
    let (config, prompt) = {
        let root = root.clone();
        let slug = slug.clone();
        let framework = body.framework.clone();
        load_blocking(move || {
            let config = Config::load(&root)?;
            let project = Project::load(&root, &slug)?;
            let spec = Specification::load(&root, &slug)?;
            let prompt = prompts::test_prompt(&project, &spec, kind, framework.as_deref());
            Ok((config, prompt))
        })
        .await?
    };

    let text = generate_text(&root, &slug, Stage::Testing, &config, prompt).await?;

    let name = body.name.unwrap_or_else(|| format!("generated {kind} tests"));
    let artifact = load_blocking(move || {
        let mut project = Project::load(&root, &slug)?;
        let artifact =
            TestArtifact::create(&root, &mut project, name, kind, body.framework, &text)?;
        mark_draft(&root, &mut project, Stage::Testing)?;
        Ok(artifact)
    })
    .await?;

    Ok(Json(artifact))
}

// ---------------------------------------------------------------------------
// POST /api/projects/:slug/docs/generate
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct GenerateDocsBody {
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

pub async fn generate_docs(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<GenerateDocsBody>,
) -> Result<Json<DocArtifact>, AppError> {
    let kind: devflow_core::types::DocKind =
        body.kind.parse().map_err(|e: DevflowError| AppError(e.into()))?;

    let root = app.root.clone();
    let (config, prompt) = {
        let root = root.clone();
        let slug = slug.clone();
        load_blocking(move || {
            let config = Config::load(&root)?;
            let project = Project::load(&root, &slug)?;
            let spec = Specification::load(&root, &slug)?;
            let prompt = prompts::documentation_prompt(&project, &spec, kind);
            Ok((config, prompt))
        })
        .await?
    };

    let text = generate_text(&root, &slug, Stage::Documentation, &config, prompt).await?;

    let title = body.title.unwrap_or_else(|| match kind {
        devflow_core::types::DocKind::Readme => "README".to_string(),
        devflow_core::types::DocKind::Api => "API reference".to_string(),
        devflow_core::types::DocKind::Guide => "User guide".to_string(),
    });
    let artifact = load_blocking(move || {
        let mut project = Project::load(&root, &slug)?;
        let artifact = DocArtifact::create(&root, &mut project, kind, title, &text)?;
        mark_draft(&root, &mut project, Stage::Documentation)?;
        Ok(artifact)
    })
    .await?;

    Ok(Json(artifact))
}
