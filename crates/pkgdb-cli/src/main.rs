mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, package::PackageSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pkgdb",
    about = "Package ownership lifecycle: orphan, unorphan, retire and unretire package listings",
    version,
    propagate_version = true
)]
struct Cli {
    /// Database root (default: auto-detect from .pkgdb/)
    #[arg(long, global = true, env = "PKGDB_ROOT")]
    root: Option<PathBuf>,

    /// Act as this user for lifecycle changes
    #[arg(long, global = true, env = "PKGDB_USER")]
    user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an empty package database in the current directory
    Init,

    /// Inspect packages and change their lifecycle state
    Package {
        #[command(subcommand)]
        subcommand: PackageSubcommand,
    },

    /// Validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Package { subcommand } => {
            cmd::package::run(&root, cli.user.as_deref(), subcommand, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
