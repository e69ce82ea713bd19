use clap::ValueEnum;
use eyre::Result;

use crate::{client::DeviceClient, config::Config};

#[derive(Copy, Clone, ValueEnum)]
pub enum Channel {
    Light,
    Distance,
    All,
}

pub async fn read(channel: Channel, config_path: &str) -> Result<()> {
    let config = Config::load_or_default(config_path).await?;
    let client = DeviceClient::from_config(&config);

    match channel {
        Channel::Light => println!("LDR: {}", client.read_light().await?),
        Channel::Distance => println!("Distance: {} cm", client.read_distance().await?),

        Channel::All => {
            let snapshot = client.read_all().await?;

            println!("Distance: {} cm", snapshot.distance);
            println!("LDR: {}", snapshot.light);
        }
    }

    Ok(())
}
