use crate::cmd::generate::{run_completion, touch_stage};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::prompts;
use devflow_core::record::CodeArtifact;
use devflow_core::specification::Specification;
use devflow_core::types::Stage;
use std::path::Path;

#[derive(Subcommand)]
pub enum CodeSubcommand {
    /// List a project's code artifacts
    List { slug: String },
    /// Print one artifact's code
    Show { slug: String, id: String },
    /// Remove a code artifact
    Rm { slug: String, id: String },
    /// Generate code from the specification
    Generate {
        slug: String,
        /// Target language, e.g. python
        language: String,
        #[arg(long)]
        framework: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: CodeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CodeSubcommand::List { slug } => list(root, &slug, json),
        CodeSubcommand::Show { slug, id } => show(root, &slug, &id, json),
        CodeSubcommand::Rm { slug, id } => rm(root, &slug, &id, json),
        CodeSubcommand::Generate {
            slug,
            language,
            framework,
        } => generate(root, &slug, language, framework, json),
    }
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let artifacts = CodeArtifact::list(root, slug).context("failed to list code artifacts")?;

    if json {
        print_json(&artifacts)?;
        return Ok(());
    }
    if artifacts.is_empty() {
        println!("No code artifacts yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = artifacts
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.language.clone(),
                a.framework.clone().unwrap_or_default(),
                format!("{} chars", a.content.len()),
            ]
        })
        .collect();
    print_table(&["ID", "LANGUAGE", "FRAMEWORK", "SIZE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let artifact =
        CodeArtifact::load(root, slug, id).with_context(|| format!("code '{id}' not found"))?;
    if json {
        print_json(&artifact)?;
    } else {
        println!("{}", artifact.content);
    }
    Ok(())
}

fn rm(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    CodeArtifact::delete(root, slug, id).with_context(|| format!("code '{id}' not found"))?;
    if json {
        print_json(&serde_json::json!({ "id": id, "removed": true }))?;
    } else {
        println!("Removed {id}");
    }
    Ok(())
}

fn generate(
    root: &Path,
    slug: &str,
    language: String,
    framework: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let spec = Specification::load(root, slug)
        .context("generate the specification first: devflow spec generate <slug>")?;

    let prompt = prompts::code_prompt(&project, &spec, &language, framework.as_deref());
    let text = run_completion(root, slug, Stage::Code, prompt)?;

    let artifact = CodeArtifact::create(
        root,
        &mut project,
        language,
        framework,
        Some("generated".to_string()),
        &text,
    )?;
    touch_stage(root, &mut project, Stage::Code)?;

    if json {
        print_json(&artifact)?;
    } else {
        println!(
            "Generated code {} ({} chars of {})",
            artifact.id,
            artifact.content.len(),
            artifact.language
        );
    }
    Ok(())
}
