//! # Ingestion Gate Module
//!
//! Turns a raw `POST /data` body into store appends.
//!
//! ## Filters, in order, per record
//! 1. Unrecognized name or missing field: record skipped
//! 2. Recording idle: record skipped (state read per record, not per batch)
//! 3. Timestamp not newer than the group's last sample: dropped by the store
//!
//! None of these are reported to the sender. Only a body that is not a JSON
//! object with a `payload` array fails the request.

use crate::error::{IngestError, RecordRejection};
use crate::hub::SensorHub;
use crate::sensor::{decode_record, SensorBatch};
use crate::timeseries::Append;

/// What happened to the records of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub stored: usize,
    pub out_of_order: usize,
    pub idle: usize,
    pub ignored: usize,
    pub rejected: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.stored + self.out_of_order + self.idle + self.ignored + self.rejected
    }
}

/// Parse a request body and feed its records through the gate
pub fn ingest_body(body: &[u8], hub: &SensorHub) -> Result<IngestSummary, IngestError> {
    let batch: SensorBatch = serde_json::from_slice(body).map_err(IngestError::MalformedPayload)?;
    Ok(ingest_batch(&batch, hub))
}

pub fn ingest_batch(batch: &SensorBatch, hub: &SensorHub) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for record in &batch.payload {
        let event = match decode_record(record) {
            Ok(event) => event,
            Err(RecordRejection::Unrecognized(_)) => {
                summary.ignored += 1;
                continue;
            }
            Err(rejection) => {
                log::debug!("{}", rejection);
                summary.rejected += 1;
                continue;
            }
        };

        if !hub.recording.is_active() {
            summary.idle += 1;
            continue;
        }

        match hub.store.append(event.group, event.time_us, &event.values) {
            Append::Stored => summary.stored += 1,
            Append::OutOfOrder => summary.out_of_order += 1,
            Append::FieldCountMismatch => {
                log::warn!("Field count mismatch for {} group", event.group.name());
                summary.rejected += 1;
            }
        }
    }

    log::debug!(
        "Batch of {}: {} stored, {} out of order, {} while idle, {} ignored, {} rejected",
        summary.total(),
        summary.stored,
        summary.out_of_order,
        summary.idle,
        summary.ignored,
        summary.rejected
    );

    summary
}
