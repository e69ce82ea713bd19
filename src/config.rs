use std::{io, time::Duration};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the device-control server.
    pub base_url: String,

    /// Period of the recurring sensor poll.
    pub poll_interval_ms: u64,

    /// Auto-dismiss delay for confirmation notices.
    pub notice_success_ms: u64,

    /// Auto-dismiss delay for error notices.
    pub notice_error_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_owned(),
            poll_interval_ms: 1000,
            notice_success_ms: 2000,
            notice_error_ms: 3000,
        }
    }
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        let data = fs::read(path)
            .await
            .wrap_err_with(|| format!("Failed to read config file {path}"))?;

        serde_yaml::from_slice(&data).wrap_err("Failed to parse config")
    }

    /// Loads the config, falling back to defaults when the file is absent.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        match fs::read(path).await {
            Ok(data) => serde_yaml::from_slice(&data).wrap_err("Failed to parse config"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => {
                Err(error).wrap_err_with(|| format!("Failed to read config file {path}"))
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notice_success(&self) -> Duration {
        Duration::from_millis(self.notice_success_ms)
    }

    pub fn notice_error(&self) -> Duration {
        Duration::from_millis(self.notice_error_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let config: Config = serde_yaml::from_str("base_url: http://10.0.0.5:8000\n").unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.notice_error(), Duration::from_millis(3000));
    }

    #[test]
    fn default_targets_loopback() {
        assert_eq!(Config::default().base_url, DEFAULT_BASE_URL);
    }
}
