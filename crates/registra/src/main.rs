//! Registra - academic enrollment management server.
//!
//! Main entry point for the Registra CLI.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use registra_server::{Server, ServerConfig};
use registra_store::RegistryStore;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Registra - academic enrollment management server
#[derive(Parser)]
#[command(name = "registra")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Create the database and schema without starting the server
    Init(InitArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind the server to
    #[arg(long, env = "REGISTRA_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Path to the SQLite database (defaults to the platform data dir)
    #[arg(long, env = "REGISTRA_DB")]
    pub db: Option<PathBuf>,

    /// Bootstrap admin token. Without it, admin operations require a
    /// user account with the admin role.
    #[arg(long, env = "REGISTRA_BOOTSTRAP_TOKEN")]
    pub bootstrap_token: Option<String>,

    /// Semester code fee routes default to
    #[arg(long, env = "REGISTRA_CURRENT_SEMESTER")]
    pub current_semester: Option<String>,

    /// CORS allowed origins (repeatable)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Disable per-request logging
    #[arg(long)]
    pub quiet_requests: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Path to the SQLite database (defaults to the platform data dir)
    #[arg(long, env = "REGISTRA_DB")]
    pub db: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "registra=debug,registra_server=debug,registra_core=debug,registra_store=debug,info"
    } else {
        "registra=info,registra_server=info,registra_core=info,registra_store=info,warn"
    };
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Init(args) => init(args),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let db_path = resolve_db_path(args.db)?;
    info!(db = %db_path.display(), "Opening store");
    let store = RegistryStore::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;

    if args.bootstrap_token.is_none() {
        tracing::warn!("No bootstrap token configured; admin access requires an admin user");
    }

    let mut config = ServerConfig::new(args.bootstrap_token)
        .with_bind_address(args.bind)
        .with_request_logging(!args.quiet_requests)
        .with_cors_origins(args.cors_origins);
    if let Some(semester) = args.current_semester {
        config = config.with_current_semester(semester);
    }

    let server = Server::new(std::sync::Arc::new(store), config);
    server.run().await.context("server exited with error")
}

fn init(args: InitArgs) -> Result<()> {
    let db_path = resolve_db_path(args.db)?;
    RegistryStore::open(&db_path)
        .with_context(|| format!("failed to initialize store at {}", db_path.display()))?;
    info!(db = %db_path.display(), "Database initialized");
    Ok(())
}

fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let base = dirs::data_dir().context("could not determine platform data directory")?;
    Ok(base.join("registra").join("registra.db"))
}
