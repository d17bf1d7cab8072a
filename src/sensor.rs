//! # Sensor Payload Module
//!
//! Wire format pushed by the phone sensor-logger app and the decoding of
//! single records into store-ready events.
//!
//! ## Wire Format
//! ```text
//! { "payload": [
//!     { "name": "accelerometer", "time": 1698765432123456789,
//!       "values": { "x": 0.1, "y": 9.8, "z": 0.2 } },
//!     { "name": "wrist motion", "time": ..., "values": { "rotationRateX": ..., ... } },
//!     { "name": "battery", ... }
//! ] }
//! ```
//!
//! Records are kept as raw JSON values until decoded one by one, so a bad
//! record only costs itself and never the whole batch.

use crate::error::RecordRejection;
use crate::store::GroupKind;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

pub const ACCELEROMETER: &str = "accelerometer";
pub const WRIST_MOTION: &str = "wrist motion";

const NANOS_PER_MICRO: i64 = 1_000;

/// Top-level body of `POST /data`
#[derive(Debug, Deserialize)]
pub struct SensorBatch {
    pub payload: Vec<Value>,
}

/// A decoded record, ready for `SensorStore::append`
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    pub group: GroupKind,
    /// Microseconds since the Unix epoch
    pub time_us: i64,
    /// Values in `group.field_names()` order
    pub values: Vec<f64>,
}

/// Convert the logger's nanosecond timestamp to the store's microseconds
pub fn nanos_to_micros(time_ns: i64) -> i64 {
    time_ns.div_euclid(NANOS_PER_MICRO)
}

/// Store timestamp as local wall-clock time
pub fn local_time(time_us: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_micros(time_us).map(|utc| utc.with_timezone(&Local))
}

/// Decode one payload record.
///
/// Only `accelerometer` and `wrist motion` are recognized; a recognized
/// record must carry an integer `time` and every numeric field of its group.
pub fn decode_record(record: &Value) -> Result<SensorEvent, RecordRejection> {
    let (group, name) = match record.get("name").and_then(Value::as_str) {
        Some(ACCELEROMETER) => (GroupKind::Phone, ACCELEROMETER),
        Some(WRIST_MOTION) => (GroupKind::Wrist, WRIST_MOTION),
        other => return Err(RecordRejection::Unrecognized(other.map(str::to_string))),
    };

    let time_ns = record
        .get("time")
        .and_then(Value::as_i64)
        .ok_or(RecordRejection::MissingField { name, field: "time" })?;

    let fields = record.get("values").and_then(Value::as_object);
    let values = group
        .field_names()
        .iter()
        .map(|&field| {
            fields
                .and_then(|map| map.get(field))
                .and_then(Value::as_f64)
                .ok_or(RecordRejection::MissingField { name, field })
        })
        .collect::<Result<Vec<f64>, RecordRejection>>()?;

    Ok(SensorEvent {
        group,
        time_us: nanos_to_micros(time_ns),
        values,
    })
}
