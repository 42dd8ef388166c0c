// ABOUTME: Command line entry point for GiveLink
// ABOUTME: `serve` runs the HTTP API, `migrate` prepares the database

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use givelink_cli::{run_migrations, run_server, Config};
use givelink_config::constants::RUST_LOG;

const DEFAULT_LOG_FILTER: &str = "givelink=info,tower_http=info";

#[derive(Parser)]
#[command(name = "givelink")]
#[command(about = "GiveLink - match donors with receivers' requests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides GIVELINK_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Database file (overrides GIVELINK_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Create the database if needed and apply migrations
    Migrate {
        /// Database file (overrides GIVELINK_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(RUST_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            run_server(config).await
        }
        Commands::Migrate { database } => {
            if let Some(database) = database {
                config.database_path = database;
            }
            run_migrations(&config).await
        }
    }
}
