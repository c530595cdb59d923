// rest_api/src/main.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use lib::ConnectionManager;
use log::{error, info};
use rest_api::config::ServerConfig;
use rest_api::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::load()?;
    info!("Starting doctor consultation API with store {}", config.database_url);

    let connection = Arc::new(ConnectionManager::new(config.storage_config()?));
    connection
        .acquire()
        .await
        .context("Failed to connect to the document store")?;

    start_server(&config, connection, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal.");
}
