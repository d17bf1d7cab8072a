//! # Ingestion Server Module
//!
//! HTTP surface the phone sensor-logger app streams into.
//!
//! ## Routes
//! - `POST /data`: batch of sensor records, answered with `success` or a 400
//! - `GET /status`: recording state and buffered sample counts as JSON
//!
//! ## Threading
//! The server runs on a dedicated thread with its own Tokio runtime, next to
//! the iced event loop that drives rendering. The two sides share nothing
//! but the `SensorHub`; startup progress flows back to the UI as
//! `ServerEvent`s over a channel.

use crate::config::Config;
use crate::error::ServerError;
use crate::hub::SensorHub;
use crate::ingest::ingest_body;
use crate::store::GroupKind;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use std::sync::mpsc;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// Server lifecycle notifications for the UI
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Listening(String),
    Error(String),
}

pub fn router(hub: SensorHub) -> Router {
    Router::new()
        .route("/data", post(receive_data))
        .route("/status", get(status))
        .with_state(hub)
}

async fn receive_data(State(hub): State<SensorHub>, body: Bytes) -> (StatusCode, String) {
    match ingest_body(&body, &hub) {
        Ok(_) => (StatusCode::OK, "success".to_string()),
        Err(e) => {
            log::warn!("Rejected ingestion request: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

async fn status(State(hub): State<SensorHub>) -> Json<serde_json::Value> {
    let recording = hub.recording.status();
    Json(serde_json::json!({
        "recording": recording.is_active(),
        "label": recording.label(),
        "phone_samples": hub.store.len(GroupKind::Phone),
        "wrist_samples": hub.store.len(GroupKind::Wrist),
    }))
}

/// Owns the listening address and runs the HTTP server to completion.
pub struct IngestServer {
    addr: String,
    hub: SensorHub,
    events: mpsc::Sender<ServerEvent>,
}

impl IngestServer {
    pub fn new(config: &Config, hub: SensorHub, events: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            addr: config.listen_addr(),
            hub,
            events,
        }
    }

    /// Runs the server loop.
    ///
    /// Blocks until the server stops, so call it from a spawned thread.
    /// Failures are logged and reported to the UI; they never end the process.
    pub fn run(self) {
        let rt = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                self.report(ServerError::RuntimeCreation(e.to_string()));
                return;
            }
        };

        if let Err(e) = rt.block_on(self.serve()) {
            self.report(e);
        }
    }

    async fn serve(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr.clone(),
                source,
            })?;

        log::info!("Listening for sensor data on http://{}/data", self.addr);
        let _ = self.events.send(ServerEvent::Listening(self.addr.clone()));

        axum::serve(listener, router(self.hub.clone()))
            .await
            .map_err(ServerError::Serve)
    }

    fn report(&self, error: ServerError) {
        log::error!("{}", error);
        let _ = self.events.send(ServerEvent::Error(error.to_string()));
    }
}
