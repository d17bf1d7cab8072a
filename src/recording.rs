//! # Recording State Module
//!
//! Process-wide record/idle toggle shared by the ingestion handler (checked
//! per record), the render tick (checked once per tick) and the save action.
//! Backed by a single `AtomicBool`, so a toggle racing an ingestion check
//! always reads either the old or the new state.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether incoming samples are being retained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    Idle,
    Active,
}

impl RecordingStatus {
    /// Text for the record button
    pub fn label(&self) -> &'static str {
        match self {
            RecordingStatus::Idle => "Start Recording",
            RecordingStatus::Active => "Stop Recording",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RecordingStatus::Active)
    }

    fn from_flag(active: bool) -> Self {
        if active {
            RecordingStatus::Active
        } else {
            RecordingStatus::Idle
        }
    }
}

#[derive(Debug)]
pub struct RecordingController {
    active: AtomicBool,
}

impl RecordingController {
    pub fn new(initial: RecordingStatus) -> Self {
        Self {
            active: AtomicBool::new(initial.is_active()),
        }
    }

    pub fn status(&self) -> RecordingStatus {
        RecordingStatus::from_flag(self.active.load(Ordering::SeqCst))
    }

    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    pub fn label(&self) -> &'static str {
        self.status().label()
    }

    /// Flip the state and return the new one
    pub fn toggle(&self) -> RecordingStatus {
        let previous = self.active.fetch_xor(true, Ordering::SeqCst);
        let status = RecordingStatus::from_flag(!previous);
        log::info!("Recording {}", if status.is_active() { "started" } else { "stopped" });
        status
    }
}

impl Default for RecordingController {
    fn default() -> Self {
        Self::new(RecordingStatus::Idle)
    }
}
