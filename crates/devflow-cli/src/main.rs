mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    code::CodeSubcommand, config::ConfigSubcommand, design::DesignSubcommand,
    docs::DocSubcommand, project::ProjectSubcommand, requirement::ReqSubcommand,
    spec::SpecSubcommand, testing::TestSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devflow",
    about = "Guided SDLC workflow — requirements, specification, design, code, docs, and tests",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .devflow/ or .git/)
    #[arg(long, global = true, env = "DEVFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a devflow workspace in the current project
    Init {
        /// Workspace name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show workspace state
    State,

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage requirements
    Req {
        #[command(subcommand)]
        subcommand: ReqSubcommand,
    },

    /// Show, edit, or generate the specification
    Spec {
        #[command(subcommand)]
        subcommand: SpecSubcommand,
    },

    /// Manage design diagrams
    Design {
        #[command(subcommand)]
        subcommand: DesignSubcommand,
    },

    /// Manage code artifacts
    Code {
        #[command(subcommand)]
        subcommand: CodeSubcommand,
    },

    /// Manage test artifacts
    Test {
        #[command(subcommand)]
        subcommand: TestSubcommand,
    },

    /// Manage documentation artifacts
    Doc {
        #[command(subcommand)]
        subcommand: DocSubcommand,
    },

    /// Inspect or validate the workspace configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Launch the web API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Req { subcommand } => cmd::requirement::run(&root, subcommand, cli.json),
        Commands::Spec { subcommand } => cmd::spec::run(&root, subcommand, cli.json),
        Commands::Design { subcommand } => cmd::design::run(&root, subcommand, cli.json),
        Commands::Code { subcommand } => cmd::code::run(&root, subcommand, cli.json),
        Commands::Test { subcommand } => cmd::testing::run(&root, subcommand, cli.json),
        Commands::Doc { subcommand } => cmd::docs::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
