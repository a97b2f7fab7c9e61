use crate::cmd::generate::{run_completion, touch_stage};
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use devflow_core::project::Project;
use devflow_core::sections::{parse_sections, Section};
use devflow_core::specification::Specification;
use devflow_core::types::Stage;
use devflow_core::{prompts, DevflowError};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum SpecSubcommand {
    /// Show the stored specification
    Show { slug: String },
    /// Set one section of the specification by hand
    Set {
        slug: String,
        /// Section key, e.g. functional_requirements
        section: String,
        text: String,
    },
    /// Generate the specification from the gathered requirements
    Generate { slug: String },
}

pub fn run(root: &Path, subcmd: SpecSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SpecSubcommand::Show { slug } => show(root, &slug, json),
        SpecSubcommand::Set {
            slug,
            section,
            text,
        } => set(root, &slug, &section, text, json),
        SpecSubcommand::Generate { slug } => generate(root, &slug, json),
    }
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let spec = Specification::load(root, slug)
        .with_context(|| format!("no specification for '{slug}' yet"))?;

    if json {
        print_json(&spec)?;
        return Ok(());
    }

    for section in Section::all() {
        let body = spec.section(*section);
        println!("== {} ==", section.heading());
        if body.is_empty() {
            println!("(empty)\n");
        } else {
            println!("{body}\n");
        }
    }
    Ok(())
}

fn set(root: &Path, slug: &str, section: &str, text: String, json: bool) -> anyhow::Result<()> {
    let section =
        Section::from_str(section).with_context(|| format!("unknown section: {section}"))?;
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let mut spec = match Specification::load(root, slug) {
        Ok(spec) => spec,
        Err(DevflowError::SpecificationNotFound(_)) => Specification::new_manual(),
        Err(e) => return Err(e.into()),
    };
    spec.set_section(section, text);
    spec.save(root, slug).context("failed to save specification")?;
    touch_stage(root, &mut project, Stage::Specification)?;

    if json {
        print_json(&spec)?;
    } else {
        println!("Updated {section} for '{slug}'");
    }
    Ok(())
}

fn generate(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut project =
        Project::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let prompt = prompts::specification_prompt(&project);

    let text = run_completion(root, slug, Stage::Specification, prompt)?;

    let parsed = parse_sections(&text);
    let config = devflow_core::config::Config::load(root)?;
    let spec =
        Specification::from_parsed(&parsed, Some(config.generator.model), text.chars().count());
    spec.save(root, slug).context("failed to save specification")?;
    touch_stage(root, &mut project, Stage::Specification)?;

    if json {
        print_json(&spec)?;
    } else {
        println!("Generated specification for '{slug}' ({} chars)", text.len());
        for section in Section::all() {
            let body = spec.section(*section);
            let status = if body.is_empty() { "empty" } else { "filled" };
            println!("  {:<30} {status}", section.to_string());
        }
    }
    Ok(())
}
