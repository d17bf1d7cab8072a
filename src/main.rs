// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod charts;
mod config;
mod error;
mod export;
mod hub;
mod ingest;
mod recording;
mod render;
mod sensor;
mod server;
mod store;
mod timeseries;
mod ui;

use app::MotionRecorder;
use config::Config;
use hub::SensorHub;
use iced::Theme;
use server::{IngestServer, ServerEvent};
use std::sync::mpsc;
use timeseries::BUFFER_CAPACITY;

fn main() -> iced::Result {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("{}; using default settings", e);
        Config::default()
    });

    // One store and one recording flag, shared by the server and the UI
    let hub = SensorHub::new(BUFFER_CAPACITY, config.initial_recording());

    // Server lifecycle notifications flow back to the UI thread
    let (event_sender, event_receiver) = mpsc::channel::<ServerEvent>();
    let server = IngestServer::new(&config, hub.clone(), event_sender);

    std::thread::spawn(move || {
        server.run();
    });

    iced::application(
        "Motion Recorder: Phone & Wrist Sensor Stream",
        MotionRecorder::update,
        MotionRecorder::view,
    )
    .subscription(MotionRecorder::subscription)
    .theme(|_| Theme::Light)
    .window_size((1200.0, 800.0))
    .run_with(move || MotionRecorder::new(hub, &config, event_receiver))
}
