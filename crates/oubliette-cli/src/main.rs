use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use oubliette_cli::{commands, logging};

#[derive(Parser)]
#[command(name = "oubliette", version, about = "Mod-authoring toolkit", long_about = None)]
struct Cli {
    /// Enables debug mode
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Also write logs to a file in the data directory
    #[arg(long)]
    log_file: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a new mod project
    Init {
        /// Name of the mod (kebab-case)
        name: String,
        /// Directory to create (defaults to the mod name)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Compile the mod: custom stages first, then the transpiler
    Build,
    /// Run only the custom-stage compiler
    Stages,
    /// Rebuild whenever source files change
    Watch,
    /// Check the project against the convention rules
    Lint {
        /// Emit findings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _guard = logging::init_logging(default_filter, cli.log_file)?;

    let project_root = match cli.project {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Command::Init { name, dir } => commands::init::run(&name, dir).await,
        Command::Build => commands::build::run(&project_root).await,
        Command::Stages => commands::stages::run(&project_root).await,
        Command::Watch => commands::watch::run(&project_root).await,
        Command::Lint { json } => commands::lint::run(&project_root, json).await,
    }
}
