use eyre::Result;
use tokio::time::interval;

use crate::{
    client::{ClientError, DeviceClient},
    config::Config,
};

/// Headless poll loop: prints combined readings until interrupted.
pub async fn watch(config_path: &str) -> Result<()> {
    let config = Config::load_or_default(config_path).await?;
    let client = DeviceClient::from_config(&config);

    tracing::info!("Polling {} every {:?}", client.base_url(), config.poll_interval());

    let mut timer = interval(config.poll_interval());

    loop {
        timer.tick().await;

        match client.read_all().await {
            Ok(snapshot) => {
                println!("distance: {} cm\tldr: {}", snapshot.distance, snapshot.light)
            }

            Err(ClientError::Upstream(raw)) => println!("sensor error: {raw}"),

            // transient failure, keep the loop running
            Err(error) => tracing::debug!("Poll failed: {error}"),
        }
    }
}
