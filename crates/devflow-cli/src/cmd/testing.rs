use crate::cmd::generate::{run_completion, touch_stage};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::prompts;
use devflow_core::record::TestArtifact;
use devflow_core::specification::Specification;
use devflow_core::types::{Stage, TestKind};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum TestSubcommand {
    /// List a project's test artifacts
    List { slug: String },
    /// Print one artifact's test code
    Show { slug: String, id: String },
    /// Remove a test artifact
    Rm { slug: String, id: String },
    /// Generate tests from the specification
    Generate {
        slug: String,
        /// unit | integration | end_to_end
        #[arg(long, default_value = "unit")]
        kind: String,
        #[arg(long)]
        framework: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: TestSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TestSubcommand::List { slug } => list(root, &slug, json),
        TestSubcommand::Show { slug, id } => show(root, &slug, &id, json),
        TestSubcommand::Rm { slug, id } => rm(root, &slug, &id, json),
        TestSubcommand::Generate {
            slug,
            kind,
            framework,
            name,
        } => generate(root, &slug, &kind, framework, name, json),
    }
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let artifacts = TestArtifact::list(root, slug).context("failed to list test artifacts")?;

    if json {
        print_json(&artifacts)?;
        return Ok(());
    }
    if artifacts.is_empty() {
        println!("No test artifacts yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = artifacts
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.kind.to_string(),
                a.framework.clone().unwrap_or_default(),
                a.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "KIND", "FRAMEWORK", "NAME"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let artifact =
        TestArtifact::load(root, slug, id).with_context(|| format!("test '{id}' not found"))?;
    if json {
        print_json(&artifact)?;
    } else {
        println!("{}", artifact.content);
    }
    Ok(())
}

fn rm(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    TestArtifact::delete(root, slug, id).with_context(|| format!("test '{id}' not found"))?;
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
    kind: &str,
    framework: Option<String>,
    name: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let kind = TestKind::from_str(kind).with_context(|| format!("unknown test kind: {kind}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let spec = Specification::load(root, slug)
        .context("generate the specification first: devflow spec generate <slug>")?;

    let prompt = prompts::test_prompt(&project, &spec, kind, framework.as_deref());
    let text = run_completion(root, slug, Stage::Testing, prompt)?;

    let name = name.unwrap_or_else(|| format!("generated {kind} tests"));
    let artifact = TestArtifact::create(root, &mut project, name, kind, framework, &text)?;
    touch_stage(root, &mut project, Stage::Testing)?;

    if json {
        print_json(&artifact)?;
    } else {
        println!("Generated tests {} — {}", artifact.id, artifact.name);
    }
    Ok(())
}
