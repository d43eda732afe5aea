mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::DrawArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "remix",
    about = "Flash drama remixer: draw a catalogued action and rewrite it around your topic",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .remix/ or .git/)
    #[arg(long, global = true, env = "REMIX_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw an action and generate a script for it
    Generate {
        #[command(flatten)]
        draw: DrawArgs,
    },

    /// Draw an action and print the composed prompt without calling the model
    Prompt {
        #[command(flatten)]
        draw: DrawArgs,
    },

    /// List the action table
    Actions {
        /// Only rows of this difficulty tier ("All" for every row)
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Start the web UI
    Ui {
        /// Port to listen on
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Inspect and initialize .remix/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Generate { draw } => cmd::generate::run(&root, draw, cli.json),
        Commands::Prompt { draw } => cmd::prompt::run(&root, draw, cli.json),
        Commands::Actions { difficulty } => {
            cmd::actions::run(&root, difficulty.as_deref(), cli.json)
        }
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
