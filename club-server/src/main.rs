//! club CLI: serve the webhook and admin API, or create the schema. Config from env and optional
//! CLI args.

use anyhow::Result;
use clap::{Parser, Subcommand};
use club_server::{migrate, run, ServerConfig};

#[derive(Parser)]
#[command(name = "club")]
#[command(about = "Bath club bot: webhook + admin API server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (config from env; flags override BOT_TOKEN, DATABASE_URL, BIND_ADDR).
    Serve {
        #[arg(short, long)]
        token: Option<String>,
        #[arg(short, long)]
        database_url: Option<String>,
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Create the database schema and exit.
    Migrate {
        #[arg(short, long)]
        database_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            token,
            database_url,
            bind,
        } => {
            let config = ServerConfig::from_env()?.with_overrides(token, database_url, bind)?;
            run(config).await
        }
        Commands::Migrate { database_url } => {
            club_core::init_tracing(None)?;
            let config = ServerConfig::from_env()?.with_overrides(None, database_url, None)?;
            migrate(&config.database_url).await
        }
    }
}
