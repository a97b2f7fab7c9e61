//! Shared completion-call plumbing for the `generate` subcommands.

use anyhow::Context;
use completion_agent::CompletionRequest;
use devflow_core::config::Config;
use devflow_core::project::Project;
use devflow_core::types::{Stage, StageStatus};
use std::path::Path;

/// Run one completion round trip for `slug`, recording the outcome in the
/// workspace generation history either way.
pub fn run_completion(root: &Path, slug: &str, stage: Stage, prompt: String) -> anyhow::Result<String> {
    let config = Config::load(root).context("failed to load config")?;
    let client = completion_agent::client_from_env(&config.generator.base_url);
    let request = CompletionRequest {
        model: config.generator.model.clone(),
        prompt,
        max_tokens: config.generator.max_tokens,
        temperature: config.generator.temperature,
    };

    let rt = tokio::runtime::Runtime::new()?;
    match rt.block_on(client.complete(&request)) {
        Ok(response) => {
            note(root, slug, stage, &config.generator.model, "ok");
            Ok(response.text)
        }
        Err(err) => {
            note(root, slug, stage, &config.generator.model, &err.to_string());
            Err(err).context("completion call failed")
        }
    }
}

/// Mark `stage` as draft the first time an artifact lands in it.
pub fn touch_stage(root: &Path, project: &mut Project, stage: Stage) -> anyhow::Result<()> {
    if project.progress_for(stage).map(|p| p.status) == Some(StageStatus::Pending) {
        project.mark_stage(stage, StageStatus::Draft);
        project.save(root)?;
    }
    Ok(())
}

fn note(root: &Path, slug: &str, stage: Stage, model: &str, outcome: &str) {
    if let Ok(mut state) = devflow_core::state::State::load(root) {
        state.record_generation(slug, stage, model, outcome);
        let _ = state.save(root);
    }
}
