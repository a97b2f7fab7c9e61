use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::types::Priority;
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ReqSubcommand {
    /// Add a requirement to a project
    Add {
        slug: String,
        title: String,
        /// must | should | could
        #[arg(long, default_value = "should")]
        priority: String,
        #[arg(long)]
        detail: Option<String>,
    },
    /// List a project's requirements
    List { slug: String },
    /// Mark a requirement as done
    Done { slug: String, id: String },
    /// Remove a requirement
    Rm { slug: String, id: String },
}

pub fn run(root: &Path, subcmd: ReqSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReqSubcommand::Add {
            slug,
            title,
            priority,
            detail,
        } => add(root, &slug, title, &priority, detail, json),
        ReqSubcommand::List { slug } => list(root, &slug, json),
        ReqSubcommand::Done { slug, id } => done(root, &slug, &id, json),
        ReqSubcommand::Rm { slug, id } => rm(root, &slug, &id, json),
    }
}

fn add(
    root: &Path,
    slug: &str,
    title: String,
    priority: &str,
    detail: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let priority =
        Priority::from_str(priority).with_context(|| format!("unknown priority: {priority}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let id = project.add_requirement(title, priority);
    if let Some(detail) = detail {
        if let Some(req) = project.requirements.iter_mut().find(|r| r.id == id) {
            req.detail = Some(detail);
        }
    }
    project.save(root).context("failed to save project")?;

    if json {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        println!("Added requirement {id}");
    }
    Ok(())
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    if json {
        print_json(&project.requirements)?;
        return Ok(());
    }

    if project.requirements.is_empty() {
        println!("No requirements yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = project
        .requirements
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.priority.to_string(),
                r.status.to_string(),
                r.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "PRIORITY", "STATUS", "TITLE"], rows);
    println!(
        "\n{}",
        devflow_core::requirement::summarize(&project.requirements)
    );
    Ok(())
}

fn done(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    project
        .complete_requirement(id)
        .with_context(|| format!("requirement '{id}' not found"))?;
    project.save(root).context("failed to save project")?;

    if json {
        print_json(&serde_json::json!({ "id": id, "status": "done" }))?;
    } else {
        println!("Marked {id} done");
    }
    Ok(())
}

fn rm(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    project
        .remove_requirement(id)
        .with_context(|| format!("requirement '{id}' not found"))?;
    project.save(root).context("failed to save project")?;

    if json {
        print_json(&serde_json::json!({ "id": id, "removed": true }))?;
    } else {
        println!("Removed {id}");
    }
    Ok(())
}
