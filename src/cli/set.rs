use eyre::Result;

use crate::{
    client::{
        DeviceClient,
        protocol::{OutputId, SwitchState},
    },
    config::Config,
};

pub async fn set(output: OutputId, state: SwitchState, config_path: &str) -> Result<()> {
    let config = Config::load_or_default(config_path).await?;
    let client = DeviceClient::from_config(&config);

    let result = client.set_output(output, state).await?;
    println!("{result}");

    Ok(())
}
