use std::io;

use eyre::Result;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod client;
pub mod config;
pub mod panel;
pub mod tui;

pub fn init() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pinboard=info")),
        )
        .with_writer(io::stderr)
        .init();

    Ok(())
}
