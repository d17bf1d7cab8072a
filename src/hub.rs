//! Shared handle to the sample store and the recording toggle.
//!
//! Cloned into the HTTP server, the iced application and the export action;
//! every clone points at the same store and flag.

use crate::recording::{RecordingController, RecordingStatus};
use crate::store::SensorStore;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SensorHub {
    pub store: Arc<SensorStore>,
    pub recording: Arc<RecordingController>,
}

impl SensorHub {
    pub fn new(capacity: usize, initial: RecordingStatus) -> Self {
        Self {
            store: Arc::new(SensorStore::new(capacity)),
            recording: Arc::new(RecordingController::new(initial)),
        }
    }
}
