use clap::{Parser, Subcommand};
use eyre::Result;

use crate::client::protocol::{OutputId, SwitchState};

mod config;
mod read;
mod run;
mod set;
mod watch;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse and print the effective configuration
    Config {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },

    /// Read a sensor channel once and print the value
    Read {
        channel: read::Channel,

        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },

    /// Launch the interactive dashboard
    Run {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },

    /// Switch an output on or off
    Set {
        output: OutputId,
        state: SwitchState,

        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },

    /// Poll all channels on the configured interval, printing readings
    Watch {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
}

pub async fn run() -> Result<()> {
    execute_command(Cli::parse().command).await
}

async fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Config { config } => self::config::read_and_print(&config).await,
        Command::Read { channel, config } => self::read::read(channel, &config).await,
        Command::Run { config } => self::run::launch(&config).await,
        Command::Set {
            output,
            state,
            config,
        } => self::set::set(output, state, &config).await,
        Command::Watch { config } => self::watch::watch(&config).await,
    }
}
