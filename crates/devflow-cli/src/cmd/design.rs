use crate::cmd::generate::{run_completion, touch_stage};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::prompts;
use devflow_core::record::Design;
use devflow_core::specification::Specification;
use devflow_core::types::{DesignKind, Stage};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Subcommand)]
pub enum DesignSubcommand {
    /// List a project's design diagrams
    List { slug: String },
    /// Print one diagram's Mermaid source
    Show { slug: String, id: String },
    /// Add a diagram from a file
    Add {
        slug: String,
        title: String,
        /// architecture | entity_relation | sequence | flowchart
        #[arg(long, default_value = "architecture")]
        kind: String,
        /// File containing Mermaid source
        #[arg(long)]
        file: PathBuf,
    },
    /// Remove a diagram
    Rm { slug: String, id: String },
    /// Generate a diagram from the specification
    Generate {
        slug: String,
        /// architecture | entity_relation | sequence | flowchart
        #[arg(long, default_value = "architecture")]
        kind: String,
        #[arg(long)]
        title: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: DesignSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DesignSubcommand::List { slug } => list(root, &slug, json),
        DesignSubcommand::Show { slug, id } => show(root, &slug, &id, json),
        DesignSubcommand::Add {
            slug,
            title,
            kind,
            file,
        } => add(root, &slug, title, &kind, &file, json),
        DesignSubcommand::Rm { slug, id } => rm(root, &slug, &id, json),
        DesignSubcommand::Generate { slug, kind, title } => {
            generate(root, &slug, &kind, title, json)
        }
    }
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let designs = Design::list(root, slug).context("failed to list designs")?;

    if json {
        print_json(&designs)?;
        return Ok(());
    }
    if designs.is_empty() {
        println!("No designs yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = designs
        .iter()
        .map(|d| vec![d.id.clone(), d.kind.to_string(), d.title.clone()])
        .collect();
    print_table(&["ID", "KIND", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let design =
        Design::load(root, slug, id).with_context(|| format!("design '{id}' not found"))?;
    if json {
        print_json(&design)?;
    } else {
        println!("{}", design.diagram);
    }
    Ok(())
}

fn add(
    root: &Path,
    slug: &str,
    title: String,
    kind: &str,
    file: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let kind = DesignKind::from_str(kind).with_context(|| format!("unknown design kind: {kind}"))?;
    let diagram = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let design = Design::create(root, &mut project, title, kind, &diagram, None)?;
    touch_stage(root, &mut project, Stage::Design)?;

    if json {
        print_json(&design)?;
    } else {
        println!("Added design {} — {}", design.id, design.title);
    }
    Ok(())
}

fn rm(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    Design::delete(root, slug, id).with_context(|| format!("design '{id}' not found"))?;
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
    let kind = DesignKind::from_str(kind).with_context(|| format!("unknown design kind: {kind}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let spec = Specification::load(root, slug)
        .context("generate the specification first: devflow spec generate <slug>")?;

    let prompt = prompts::design_prompt(&project, &spec, kind);
    let text = run_completion(root, slug, Stage::Design, prompt)?;

    let title = title.unwrap_or_else(|| format!("{kind} diagram"));
    let design = Design::create(root, &mut project, title, kind, &text, None)?;
    touch_stage(root, &mut project, Stage::Design)?;

    if json {
        print_json(&design)?;
    } else {
        println!("Generated design {} — {}", design.id, design.title);
    }
    Ok(())
}
