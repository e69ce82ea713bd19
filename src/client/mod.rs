use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

pub mod protocol;

use protocol::{OutputId, Reading, SensorsPayload, SwitchState, decode_reading};

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced at the device boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, non-success status or an unreadable body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was valid JSON but did not match the endpoint's contract.
    #[error("malformed payload from {endpoint}: {body}")]
    MalformedPayload { endpoint: String, body: String },

    /// A 200 response carrying the device's own sensor-failure indicator.
    #[error("device reported a sensor failure: {0}")]
    Upstream(String),
}

/// HTTP client for the device-control server.
///
/// Requests carry no timeout: a hung request is left to the transport, which
/// matches the behaviour of the board's single-connection firmware.
pub struct DeviceClient {
    http: reqwest::Client,
    base: String,
}

impl DeviceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();

        while base.ends_with('/') {
            base.pop();
        }

        DeviceClient {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /* == Control == */

    /// Switches an output on or off, returning the server's result text.
    pub async fn set_output(&self, output: OutputId, state: SwitchState) -> Result<String> {
        let endpoint = output.path(state);
        let url = format!("{}{endpoint}", self.base);

        let body: Value = self
            .http
            .post(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.get("result").and_then(Value::as_str) {
            Some(text) => Ok(text.to_owned()),
            None => Err(malformed(endpoint, &body)),
        }
    }

    /* == Sensors == */

    pub async fn read_light(&self) -> Result<Reading> {
        self.read_channel("/ldr", "ldr_value", "ldr").await
    }

    pub async fn read_distance(&self) -> Result<Reading> {
        self.read_channel("/ultrasonic", "distance_cm", "distance")
            .await
    }

    /// Reads both channels from the combined endpoint.
    pub async fn read_all(&self) -> Result<SensorSnapshot> {
        let body = self.get_json("/sensors").await?;

        let payload: SensorsPayload =
            serde_json::from_value(body.clone()).map_err(|_| malformed("/sensors", &body))?;

        if payload.error.is_some() {
            let detail = payload
                .raw
                .unwrap_or_else(|| "unspecified sensor failure".to_owned());

            return Err(ClientError::Upstream(detail));
        }

        let decode = |field: Option<&Value>, inner| {
            field
                .and_then(|value| decode_reading(value, inner))
                .ok_or_else(|| malformed("/sensors", &body))
        };

        Ok(SensorSnapshot {
            distance: decode(payload.distance.as_ref(), "distance")?,
            light: decode(payload.ldr.as_ref(), "ldr")?,
        })
    }

    async fn read_channel(
        &self,
        endpoint: &'static str,
        field: &'static str,
        inner: &'static str,
    ) -> Result<Reading> {
        let body = self.get_json(endpoint).await?;

        body.get(field)
            .and_then(|value| decode_reading(value, inner))
            .ok_or_else(|| malformed(endpoint, &body))
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{endpoint}", self.base);

        Ok(self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// Both channel values as returned by one combined read.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorSnapshot {
    pub distance: Reading,
    pub light: Reading,
}

fn malformed(endpoint: impl Into<String>, body: &Value) -> ClientError {
    ClientError::MalformedPayload {
        endpoint: endpoint.into(),
        body: body.to_string(),
    }
}
