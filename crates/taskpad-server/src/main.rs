use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use taskpad_db::DbConfig;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "taskpad-server")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "TASKPAD_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "TASKPAD_PORT", default_value_t = 5000)]
    port: u16,

    /// Postgres connection string; omit to run purely in memory
    #[arg(long, env = "TASKPAD_DATABASE_URL")]
    database_url: Option<String>,

    /// Seconds to wait for the database before falling back to memory
    #[arg(long, env = "TASKPAD_DB_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    db_connect_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db = taskpad_db::connect(&DbConfig {
        database_url: cli.database_url,
        connect_timeout: Duration::from_secs(cli.db_connect_timeout_secs),
    })
    .await;

    let addr = SocketAddr::new(cli.bind.parse()?, cli.port);
    let listener = TcpListener::bind(addr).await?;
    info!("taskpad-server listening on http://{addr}");

    taskpad_server::serve(listener, db).await?;

    Ok(())
}
