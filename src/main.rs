use anyhow::Result;
use maxbridge::fetch::HttpFetcher;
use maxbridge::logging::{get_logger, init_logging};
use maxbridge::{Bridge, Config, PlatformSetup};
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))?;

    let logger = get_logger("main");
    logger.info(&format!("maxbridge {} starting up", env!("APP_VERSION")));

    let fetcher = Arc::new(HttpFetcher::new()?);
    let setup = PlatformSetup::setup(&config, fetcher)
        .await
        .map_err(|e| anyhow::anyhow!("Setup failed: {}", e))?;
    let mut bridge = Bridge::new(setup);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal_logger = logger.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                signal_logger.info("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                signal_logger.error(&format!("Unable to listen for Ctrl-C: {}", e));
                // Keep the sender alive; dropping it stops the poll loop
                std::future::pending::<()>().await;
            }
        }
    });

    bridge.run(shutdown_rx).await?;
    logger.info("Shutdown complete");
    Ok(())
}
