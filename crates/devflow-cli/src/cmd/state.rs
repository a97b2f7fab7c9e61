use crate::output::{print_json, print_table};
use anyhow::Context;
use devflow_core::project::Project;
use devflow_core::state::State;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = State::load(root).context("failed to load state")?;
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        let value = serde_json::json!({
            "workspace": state.workspace,
            "active_projects": state.active_projects,
            "projects": projects.iter().map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "name": p.name,
                    "stage": p.stage.to_string(),
                    "requirements": devflow_core::requirement::summarize(&p.requirements),
                })
            }).collect::<Vec<_>>(),
            "last_updated": state.last_updated,
        });
        return print_json(&value);
    }

    println!("Workspace: {}", state.workspace);
    if projects.is_empty() {
        println!("No projects yet. Create one with: devflow project create <slug>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.stage.to_string(),
                devflow_core::requirement::summarize(&p.requirements),
                p.name.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "STAGE", "REQUIREMENTS", "NAME"], rows);

    if !state.generations.is_empty() {
        println!("\nRecent generations:");
        for entry in state.generations.iter().rev().take(5) {
            println!(
                "  {} {} {} — {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.project,
                entry.stage,
                entry.outcome
            );
        }
    }
    Ok(())
}
