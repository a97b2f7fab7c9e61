use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devflow_core::{config::Config, project::Project, state::State, types::Stage};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a new project
    Create {
        slug: String,
        #[arg(long)]
        name: Option<String>,
        /// Optional one-liner description of the project's intent
        #[arg(long)]
        description: Option<String>,
    },
    /// List all projects
    List,
    /// Show project details
    Show { slug: String },
    /// Advance a project to a later stage
    Advance { slug: String, stage: String },
    /// Archive a project
    Archive { slug: String },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            slug,
            name,
            description,
        } => create(root, &slug, name, description, json),
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Show { slug } => show(root, &slug, json),
        ProjectSubcommand::Advance { slug, stage } => advance(root, &slug, &stage, json),
        ProjectSubcommand::Archive { slug } => archive(root, &slug, json),
    }
}

fn create(
    root: &Path,
    slug: &str,
    name: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(|| slug.replace('-', " "));
    let mut project = Project::create(root, slug, &name)
        .with_context(|| format!("failed to create project '{slug}'"))?;
    if let Some(desc) = description {
        project.description = Some(desc);
        project.save(root).context("failed to save project")?;
    }

    let mut state = State::load(root).context("failed to load state")?;
    state.add_active_project(slug);
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&project)?;
    } else {
        println!("Created project: {slug} — {name}");
        println!("Next: devflow req add {slug} \"<requirement>\"");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        let summaries: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "name": p.name,
                    "description": p.description,
                    "stage": p.stage.to_string(),
                    "archived": p.archived,
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.stage.to_string(),
                if p.archived {
                    "archived".to_string()
                } else {
                    String::new()
                },
                p.name.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "STAGE", "STATUS", "NAME"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project = Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    if json {
        print_json(&project)?;
        return Ok(());
    }

    println!("Project: {} — {}", project.slug, project.name);
    if let Some(ref desc) = project.description {
        println!("Desc:    {desc}");
    }
    println!("Stage:   {}", project.stage);
    println!("Created: {}", project.created_at.format("%Y-%m-%d %H:%M"));

    println!("\nProgress:");
    for p in &project.progress {
        println!("  {:<15} {}", p.stage.to_string(), p.status);
    }

    if !project.requirements.is_empty() {
        println!("\nRequirements ({}):", project.requirements.len());
        for req in &project.requirements {
            println!("  [{}] {} ({}) — {}", req.id, req.status, req.priority, req.title);
        }
    }

    Ok(())
}

fn advance(root: &Path, slug: &str, stage_str: &str, json: bool) -> anyhow::Result<()> {
    let target =
        Stage::from_str(stage_str).with_context(|| format!("unknown stage: {stage_str}"))?;

    let config = Config::load(root).context("failed to load config")?;
    let mut project = Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    project
        .advance(target, &config)
        .with_context(|| format!("cannot advance '{slug}' to {stage_str}"))?;
    project.save(root).context("failed to save project")?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "stage": target.to_string(),
        }))?;
    } else {
        println!("Advanced '{slug}' to {target}");
    }
    Ok(())
}

fn archive(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut project = Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    project.archived = true;
    project.save(root).context("failed to save project")?;

    let mut state = State::load(root).context("failed to load state")?;
    state.remove_active_project(slug);
    state.save(root).context("failed to save state")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "archived": true }))?;
    } else {
        println!("Archived project: {slug}");
    }
    Ok(())
}
