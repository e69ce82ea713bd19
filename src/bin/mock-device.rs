//! Simulated bench board: serves the device-control HTTP surface with
//! deterministic fake readings, for demos and manual testing.

use std::{
    net::Ipv4Addr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{
    Json, Router, extract,
    routing::{get, post},
    serve,
};
use clap::Parser;
use eyre::Result;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Serve sensor values in the legacy doubly-encoded shape
    #[arg(long)]
    nested: bool,

    /// Report an upstream sensor failure on /sensors
    #[arg(long)]
    faulty: bool,
}

struct AppState {
    ticks: AtomicU64,
    nested: bool,
    faulty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init()?;

    let opts = Opts::parse();

    let state = Arc::new(AppState {
        ticks: AtomicU64::new(0),
        nested: opts.nested,
        faulty: opts.faulty,
    });

    let app = Router::new()
        .route("/led/{id}/{state}", post(led))
        .route("/buzzer/{state}", post(buzzer))
        .route("/ldr", get(ldr))
        .route("/ultrasonic", get(ultrasonic))
        .route("/sensors", get(sensors))
        .with_state(state);

    let socket = TcpListener::bind((Ipv4Addr::LOCALHOST, opts.port)).await?;

    tracing::info!("Mock device listening on http://127.0.0.1:{}", opts.port);
    serve(socket, app).await?;

    Ok(())
}

fn init() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter("mock_device=info")
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/* == Outputs == */

async fn led(extract::Path((id, state)): extract::Path<(u8, String)>) -> Json<Value> {
    Json(json!({ "result": format!("LED{id} {}", state.to_uppercase()) }))
}

async fn buzzer(extract::Path(state): extract::Path<String>) -> Json<Value> {
    Json(json!({ "result": format!("BUZZER {}", state.to_uppercase()) }))
}

/* == Sensors == */

async fn ldr(extract::State(state): extract::State<Arc<AppState>>) -> Json<Value> {
    let value = fake_reading(state.next_tick(), 200, 800);

    Json(match state.nested {
        true => json!({ "ldr_value": json!({ "ldr": value }).to_string() }),
        false => json!({ "ldr_value": value }),
    })
}

async fn ultrasonic(extract::State(state): extract::State<Arc<AppState>>) -> Json<Value> {
    let value = fake_reading(state.next_tick(), 5, 120);

    Json(match state.nested {
        true => json!({ "distance_cm": json!({ "distance": value }).to_string() }),
        false => json!({ "distance_cm": value }),
    })
}

async fn sensors(extract::State(state): extract::State<Arc<AppState>>) -> Json<Value> {
    if state.faulty {
        return Json(json!({ "error": true, "raw": "sensor read timed out" }));
    }

    let tick = state.next_tick();

    Json(json!({
        "distance": fake_reading(tick, 5, 120),
        "ldr": fake_reading(tick, 200, 800),
    }))
}

impl AppState {
    fn next_tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::Relaxed)
    }
}

/// Deterministic triangle wave between `min` and `max`.
fn fake_reading(tick: u64, min: u64, max: u64) -> u64 {
    let span = max - min;
    let phase = tick % (2 * span);

    min + if phase < span { phase } else { 2 * span - phase }
}
