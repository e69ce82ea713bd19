use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    client::{
        ClientError, DeviceClient,
        protocol::{OUTPUT_COUNT, OutputId, Reading, SwitchState},
    },
    config::Config,
};

pub mod poller;

/* == State == */

/// Last-known value of a sensor channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SensorValue {
    /// No successful read yet.
    #[default]
    Unknown,
    /// The device reported a read failure on the combined endpoint.
    Error,
    Value(Reading),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Unknown => write!(f, "--"),
            SensorValue::Error => write!(f, "Error"),
            SensorValue::Value(reading) => write!(f, "{reading}"),
        }
    }
}

/// A request whose liveness is tracked by a loading flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Output(OutputId),
    Light,
    Distance,
    Combined,
}

/// View state of the dashboard: per-output toggles, last-read sensor values,
/// loading flags and transient notices. Never persisted.
#[derive(Default)]
pub struct PanelState {
    outputs: [bool; OUTPUT_COUNT],
    output_loading: [bool; OUTPUT_COUNT],

    pub light: SensorValue,
    pub distance: SensorValue,
    pub combined_light: SensorValue,
    pub combined_distance: SensorValue,

    light_loading: bool,
    distance_loading: bool,
    combined_loading: bool,

    notices: Vec<Notice>,
}

impl PanelState {
    pub fn output_on(&self, output: OutputId) -> bool {
        self.outputs[output.slot()]
    }

    pub fn set_output(&mut self, output: OutputId, on: bool) {
        self.outputs[output.slot()] = on;
    }

    pub fn is_loading(&self, op: Op) -> bool {
        match op {
            Op::Output(output) => self.output_loading[output.slot()],
            Op::Light => self.light_loading,
            Op::Distance => self.distance_loading,
            Op::Combined => self.combined_loading,
        }
    }

    /// Marks an operation as in flight. Returns false when the previous
    /// invocation has not settled yet, gating concurrent re-invocation.
    pub fn begin(&mut self, op: Op) -> bool {
        let flag = self.flag_mut(op);

        match *flag {
            true => false,
            false => {
                *flag = true;
                true
            }
        }
    }

    /// Clears the loading flag once the request settles, whatever the outcome.
    pub fn settle(&mut self, op: Op) {
        *self.flag_mut(op) = false;
    }

    fn flag_mut(&mut self, op: Op) -> &mut bool {
        match op {
            Op::Output(output) => &mut self.output_loading[output.slot()],
            Op::Light => &mut self.light_loading,
            Op::Distance => &mut self.distance_loading,
            Op::Combined => &mut self.combined_loading,
        }
    }

    /* == Notices == */

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.expired(now));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

/// A transient, fire-and-forget user notice with a fixed auto-dismiss delay.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
    expires_at: Instant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    pub fn new(
        kind: NoticeKind,
        title: impl Into<String>,
        body: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Notice {
            kind,
            title: title.into(),
            body: body.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/* == Controller == */

/// Translates user intent and poll ticks into device requests, and reconciles
/// each response (or failure) into the shared [`PanelState`].
///
/// Error policy: control actions notify the user, poll failures are logged and
/// leave the previous value untouched. An upstream sensor failure on the
/// combined endpoint marks both combined channels with the error placeholder.
#[derive(Clone)]
pub struct Panel {
    client: Arc<DeviceClient>,
    shared: Arc<Mutex<PanelState>>,
    notice_success: Duration,
    notice_error: Duration,
}

impl Panel {
    pub fn new(client: DeviceClient, config: &Config) -> Self {
        Panel {
            client: Arc::new(client),
            shared: Arc::new(Mutex::new(PanelState::default())),
            notice_success: config.notice_success(),
            notice_error: config.notice_error(),
        }
    }

    pub fn state(&self) -> &Arc<Mutex<PanelState>> {
        &self.shared
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Sends a control request for one output and reconciles the outcome.
    /// A second invocation for the same output is dropped while one is in
    /// flight; requests for different outputs may overlap freely.
    pub async fn set_output(&self, output: OutputId, switch: SwitchState) {
        if !self.shared.lock().await.begin(Op::Output(output)) {
            return;
        }

        let result = self.client.set_output(output, switch).await;
        let mut state = self.shared.lock().await;

        match result {
            Ok(text) => {
                state.set_output(output, switch.is_on());

                state.push_notice(Notice::new(
                    NoticeKind::Info,
                    format!("{output} {}", switch.to_string().to_uppercase()),
                    text,
                    self.notice_success,
                ));
            }

            Err(error) => {
                tracing::warn!(%output, "Control request failed: {error}");

                state.push_notice(Notice::new(
                    NoticeKind::Error,
                    "Error",
                    format!("Failed to control {output}"),
                    self.notice_error,
                ));
            }
        }

        state.settle(Op::Output(output));
    }

    pub async fn poll_light(&self) {
        if !self.shared.lock().await.begin(Op::Light) {
            return;
        }

        let result = self.client.read_light().await;
        let mut state = self.shared.lock().await;

        match result {
            Ok(reading) => state.light = SensorValue::Value(reading),
            Err(error) => tracing::debug!("Light poll failed: {error}"),
        }

        state.settle(Op::Light);
    }

    pub async fn poll_distance(&self) {
        if !self.shared.lock().await.begin(Op::Distance) {
            return;
        }

        let result = self.client.read_distance().await;
        let mut state = self.shared.lock().await;

        match result {
            Ok(reading) => state.distance = SensorValue::Value(reading),
            Err(error) => tracing::debug!("Distance poll failed: {error}"),
        }

        state.settle(Op::Distance);
    }

    pub async fn poll_combined(&self) {
        if !self.shared.lock().await.begin(Op::Combined) {
            return;
        }

        let result = self.client.read_all().await;
        let mut state = self.shared.lock().await;

        match result {
            Ok(snapshot) => {
                state.combined_distance = SensorValue::Value(snapshot.distance);
                state.combined_light = SensorValue::Value(snapshot.light);
            }

            Err(ClientError::Upstream(raw)) => {
                tracing::warn!("Device sensor failure: {raw}");

                state.combined_distance = SensorValue::Error;
                state.combined_light = SensorValue::Error;
            }

            Err(error) => tracing::debug!("Combined poll failed: {error}"),
        }

        state.settle(Op::Combined);
    }

    /// One full poll cycle across every channel.
    pub async fn poll_all(&self) {
        self.poll_light().await;
        self.poll_distance().await;
        self.poll_combined().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_start_all_off() {
        let state = PanelState::default();

        for output in [
            OutputId::Led1,
            OutputId::Led2,
            OutputId::Led3,
            OutputId::Led4,
            OutputId::Buzzer,
        ] {
            assert!(!state.output_on(output));
            assert!(!state.is_loading(Op::Output(output)));
        }
    }

    #[test]
    fn begin_gates_concurrent_invocation() {
        let mut state = PanelState::default();
        let op = Op::Output(OutputId::Led2);

        assert!(state.begin(op));
        assert!(!state.begin(op));
        assert!(state.is_loading(op));

        // an unrelated output is not affected
        assert!(state.begin(Op::Output(OutputId::Led3)));

        state.settle(op);
        assert!(!state.is_loading(op));
        assert!(state.begin(op));
    }

    #[test]
    fn notices_expire_by_deadline() {
        let mut state = PanelState::default();

        state.push_notice(Notice::new(
            NoticeKind::Info,
            "LED 1 ON",
            "LED1 ON",
            Duration::from_secs(2),
        ));

        state.prune_notices(Instant::now());
        assert_eq!(state.notices().len(), 1);

        state.prune_notices(Instant::now() + Duration::from_secs(3));
        assert!(state.notices().is_empty());
    }

    #[test]
    fn sensor_placeholders_render_as_in_the_ui() {
        assert_eq!(SensorValue::Unknown.to_string(), "--");
        assert_eq!(SensorValue::Error.to_string(), "Error");
        assert_eq!(
            SensorValue::Value(Reading::Number(42.)).to_string(),
            "42"
        );
    }
}
