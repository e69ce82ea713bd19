use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use strum::EnumIter;

/* == Outputs == */

/// A controllable binary output on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, clap::ValueEnum, strum::Display)]
pub enum OutputId {
    #[strum(serialize = "LED 1")]
    Led1,
    #[strum(serialize = "LED 2")]
    Led2,
    #[strum(serialize = "LED 3")]
    Led3,
    #[strum(serialize = "LED 4")]
    Led4,
    #[strum(serialize = "Buzzer")]
    Buzzer,
}

pub const OUTPUT_COUNT: usize = 5;

impl OutputId {
    pub fn led(number: usize) -> Option<Self> {
        match number {
            1 => Some(OutputId::Led1),
            2 => Some(OutputId::Led2),
            3 => Some(OutputId::Led3),
            4 => Some(OutputId::Led4),
            _ => None,
        }
    }

    /// Stable slot for per-output state arrays.
    pub fn slot(&self) -> usize {
        match self {
            OutputId::Led1 => 0,
            OutputId::Led2 => 1,
            OutputId::Led3 => 2,
            OutputId::Led4 => 3,
            OutputId::Buzzer => 4,
        }
    }

    /// Path of the control endpoint for this output and state.
    pub fn path(&self, state: SwitchState) -> String {
        match self {
            OutputId::Buzzer => format!("/buzzer/{state}"),
            led => format!("/led/{}/{state}", led.slot() + 1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub fn is_on(&self) -> bool {
        matches!(self, SwitchState::On)
    }
}

/* == Readings == */

/// A sensor value as reported by the device. Numeric when the firmware managed
/// a clean read, free text otherwise (e.g. an out-of-range marker).
#[derive(Clone, Debug, PartialEq)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Number(value) => write!(f, "{value}"),
            Reading::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Recovers a reading from a possibly nested sensor field.
///
/// Firmware revisions disagree on the wire shape: some send the value
/// directly, others a JSON-encoded string wrapping `{"<inner>": value}`.
/// The unwrap is idempotent, an already-plain value passes through unchanged.
/// Returns `None` when the field matches neither shape.
pub fn decode_reading(value: &Value, inner: &str) -> Option<Reading> {
    match value {
        Value::Number(number) => number.as_f64().map(Reading::Number),

        Value::Object(map) => decode_reading(map.get(inner)?, inner),

        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(nested @ (Value::Number(_) | Value::Object(_))) => decode_reading(&nested, inner),
            _ => Some(Reading::Text(text.clone())),
        },

        _ => None,
    }
}

/* == Payloads == */

/// Body of `GET /sensors`: either both channel values, or an upstream error
/// indicator with the raw firmware output in `raw`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SensorsPayload {
    pub distance: Option<Value>,
    pub ldr: Option<Value>,
    pub error: Option<Value>,
    pub raw: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_plain_number() {
        let value = json!(512);
        assert_eq!(decode_reading(&value, "ldr"), Some(Reading::Number(512.)));
    }

    #[test]
    fn decodes_plain_text() {
        let value = json!("out of range");
        assert_eq!(
            decode_reading(&value, "distance"),
            Some(Reading::Text("out of range".to_owned()))
        );
    }

    #[test]
    fn unwraps_doubly_encoded_value() {
        let value = json!(r#"{"ldr": 731}"#);
        assert_eq!(decode_reading(&value, "ldr"), Some(Reading::Number(731.)));
    }

    #[test]
    fn unwraps_nested_object() {
        let value = json!({ "distance": 14.5 });
        assert_eq!(
            decode_reading(&value, "distance"),
            Some(Reading::Number(14.5))
        );
    }

    #[test]
    fn unwrap_is_idempotent() {
        let once = decode_reading(&json!(r#"{"ldr": 9}"#), "ldr").unwrap();

        let again = match &once {
            Reading::Number(n) => decode_reading(&json!(n), "ldr").unwrap(),
            Reading::Text(t) => decode_reading(&json!(t), "ldr").unwrap(),
        };

        assert_eq!(once, again);
    }

    #[test]
    fn rejects_wrapper_without_inner_field() {
        let value = json!({ "something_else": 3 });
        assert_eq!(decode_reading(&value, "ldr"), None);
    }

    #[test]
    fn rejects_non_scalar_shapes() {
        assert_eq!(decode_reading(&json!([1, 2]), "ldr"), None);
        assert_eq!(decode_reading(&json!(null), "ldr"), None);
    }

    #[test]
    fn output_paths_match_the_http_surface() {
        assert_eq!(OutputId::Led1.path(SwitchState::On), "/led/1/on");
        assert_eq!(OutputId::Led4.path(SwitchState::Off), "/led/4/off");
        assert_eq!(OutputId::Buzzer.path(SwitchState::On), "/buzzer/on");
    }

    #[test]
    fn led_lookup_covers_the_panel() {
        assert_eq!(OutputId::led(1), Some(OutputId::Led1));
        assert_eq!(OutputId::led(4), Some(OutputId::Led4));
        assert_eq!(OutputId::led(5), None);
    }
}
