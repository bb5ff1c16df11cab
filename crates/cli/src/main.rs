mod serve;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::serve::ServeConfig;

/// Simulation record service.
#[derive(Parser)]
#[command(name = "duel-sim", version, about = "Simulation record service")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the simulations HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, env = "DUEL_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "DUEL_PORT", default_value = "8080")]
        port: u16,
        /// sqlx SQLite connection URL
        #[arg(
            long,
            env = "DUEL_DATABASE_URL",
            default_value = "sqlite://simulations.db?mode=rwc"
        )]
        database_url: String,
        /// Origin allowed to read responses cross-origin (repeatable).
        /// Defaults to the duel.tools production and staging origins.
        #[arg(
            long = "allowed-origin",
            env = "DUEL_ALLOWED_ORIGINS",
            value_delimiter = ','
        )]
        allowed_origins: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
            allowed_origins,
        } => {
            let config = ServeConfig::new(host, port, database_url, allowed_origins);
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to create tokio runtime");
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(config)) {
                tracing::error!(error = %e, "server error");
                process::exit(1);
            }
        }
    }
}
