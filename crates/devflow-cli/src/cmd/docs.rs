use crate::cmd::generate::{run_completion, touch_stage};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::prompts;
use devflow_core::record::DocArtifact;
use devflow_core::specification::Specification;
use devflow_core::types::{DocKind, Stage};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum DocSubcommand {
    /// List a project's documentation artifacts
    List { slug: String },
    /// Print one document
    Show { slug: String, id: String },
    /// Remove a document
    Rm { slug: String, id: String },
    /// Generate documentation from the specification
    Generate {
        slug: String,
        /// readme | api | guide
        #[arg(long, default_value = "readme")]
        kind: String,
        #[arg(long)]
        title: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: DocSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DocSubcommand::List { slug } => list(root, &slug, json),
        DocSubcommand::Show { slug, id } => show(root, &slug, &id, json),
        DocSubcommand::Rm { slug, id } => rm(root, &slug, &id, json),
        DocSubcommand::Generate { slug, kind, title } => generate(root, &slug, &kind, title, json),
    }
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let docs = DocArtifact::list(root, slug).context("failed to list docs")?;

    if json {
        print_json(&docs)?;
        return Ok(());
    }
    if docs.is_empty() {
        println!("No documentation yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = docs
        .iter()
        .map(|d| vec![d.id.clone(), d.kind.to_string(), d.title.clone()])
        .collect();
    print_table(&["ID", "KIND", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let doc = DocArtifact::load(root, slug, id).with_context(|| format!("doc '{id}' not found"))?;
    if json {
        print_json(&doc)?;
    } else {
        println!("{}", doc.content);
    }
    Ok(())
}

fn rm(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    DocArtifact::delete(root, slug, id).with_context(|| format!("doc '{id}' not found"))?;
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
    title: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let kind = DocKind::from_str(kind).with_context(|| format!("unknown doc kind: {kind}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let spec = Specification::load(root, slug)
        .context("generate the specification first: devflow spec generate <slug>")?;

    let prompt = prompts::documentation_prompt(&project, &spec, kind);
    let text = run_completion(root, slug, Stage::Documentation, prompt)?;

    let title = title.unwrap_or_else(|| match kind {
        DocKind::Readme => "README".to_string(),
        DocKind::Api => "API reference".to_string(),
        DocKind::Guide => "User guide".to_string(),
    });
    let doc = DocArtifact::create(root, &mut project, kind, title, &text)?;
    touch_stage(root, &mut project, Stage::Documentation)?;

    if json {
        print_json(&doc)?;
    } else {
        println!("Generated doc {} — {}", doc.id, doc.title);
    }
    Ok(())
}
