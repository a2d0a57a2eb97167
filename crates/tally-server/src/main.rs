//! Tally - personal habit, sleep and gym tracker
//!
//! `tally serve` runs the HTTP API; `tally import` pulls one user's Habitica
//! history into the database without starting the server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tally_core::{
    auth::{validate_jwt_secret, SqliteUserRepository, UserRepository},
    services::habitica::DEFAULT_BASE_URL,
    sync_user_history, Database, HabiticaClient,
};
use tally_server::{create_router, AppState};

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Personal habit, sleep and gym tracker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override database path (or set TALLY_DB_PATH env var)
    #[arg(long, env = "TALLY_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Habitica API base URL
    #[arg(long, env = "HABITICA_BASE_URL", global = true, default_value = DEFAULT_BASE_URL)]
    habitica_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "TALLY_BIND", default_value = "127.0.0.1:5000")]
        bind: String,

        /// Secret used to sign login tokens
        #[arg(long, env = "TALLY_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },

    /// Fetch and merge a user's Habitica history once
    Import {
        /// Username whose stored Habitica credentials are used
        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let db = match &cli.db {
        Some(path) => Database::open(path.clone()).await?,
        None => Database::new().await?,
    };
    let client = HabiticaClient::new(&cli.habitica_url)?;

    match cli.command {
        Commands::Serve { bind, jwt_secret } => serve(db, client, &bind, jwt_secret).await,
        Commands::Import { user } => import(db, client, &user).await,
    }
}

async fn serve(
    db: Database,
    client: HabiticaClient,
    bind: &str,
    jwt_secret: Option<String>,
) -> Result<()> {
    let jwt_secret = jwt_secret.unwrap_or_default();
    validate_jwt_secret(&jwt_secret)?;

    let state = AppState::new(db, Arc::new(client), &jwt_secret);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    log::info!("Tally API listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn import(db: Database, client: HabiticaClient, username: &str) -> Result<()> {
    let repo = SqliteUserRepository::new(&db.pool);
    let user = repo
        .find_by_username(username)
        .await?
        .with_context(|| format!("No such user: {}", username))?;

    let result = sync_user_history(&db.pool, &client, &user.id).await?;
    println!(
        "Imported Habitica history for {}: {} rows fetched, {} upserted, {} skipped",
        user.username, result.rows_fetched, result.rows_upserted, result.rows_skipped
    );
    Ok(())
}
