use eyre::Result;

use crate::{
    client::DeviceClient,
    config::Config,
    panel::{Panel, poller::Poller},
    tui,
};

pub async fn launch(config_path: &str) -> Result<()> {
    let config = Config::load_or_default(config_path).await?;
    let client = DeviceClient::from_config(&config);
    let panel = Panel::new(client, &config);

    let poller = Poller::spawn(panel.clone(), config.poll_interval());

    let terminal = ratatui::init();
    let result = tui::run(terminal, panel).await;
    ratatui::restore();

    // cancel the recurring poll before handing the terminal back
    drop(poller);

    result
}
