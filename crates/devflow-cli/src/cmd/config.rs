use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use devflow_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the workspace configuration
    Show,
    /// Validate the workspace configuration
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    if json {
        print_json(&cfg)?;
    } else {
        println!("Workspace:   {}", cfg.workspace.name);
        println!("Provider:    {}", cfg.generator.base_url);
        println!("Model:       {}", cfg.generator.model);
        println!("Max tokens:  {}", cfg.generator.max_tokens);
        println!("Temperature: {}", cfg.generator.temperature);
    }
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;
    let warnings = cfg.validate();

    if json {
        print_json(&warnings)?;
        return Ok(());
    }

    if warnings.is_empty() {
        println!("Configuration OK");
        return Ok(());
    }
    for w in &warnings {
        let level = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        println!("{level}: {}", w.message);
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
