//! # Sensor Store Module
//!
//! Owns the two channel groups fed by the ingestion endpoint: the phone
//! accelerometer and the wrist motion sensor. Each group sits behind its own
//! mutex so an append and a snapshot never interleave, and a reader always
//! sees every buffer of a group at the same instant.
//!
//! The store is constructed once in `main` and handed out as an `Arc` to the
//! HTTP handler, the render tick and the export action.

use crate::timeseries::{Append, ChannelGroup, GroupSnapshot};
use std::sync::{Mutex, MutexGuard, PoisonError};

const PHONE_FIELDS: &[&str] = &["x", "y", "z"];

const WRIST_FIELDS: &[&str] = &[
    "rotationRateX",
    "rotationRateY",
    "rotationRateZ",
    "gravityX",
    "gravityY",
    "gravityZ",
    "accelerationX",
    "accelerationY",
    "accelerationZ",
    "quaternionW",
    "quaternionX",
    "quaternionY",
    "quaternionZ",
];

/// Physical sensor source backing a channel group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Phone,
    Wrist,
}

impl GroupKind {
    /// Field names in storage order, as they appear in the sensor payload
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            GroupKind::Phone => PHONE_FIELDS,
            GroupKind::Wrist => WRIST_FIELDS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Phone => "phone",
            GroupKind::Wrist => "wrist",
        }
    }
}

/// Thread-safe holder of both channel groups
#[derive(Debug)]
pub struct SensorStore {
    phone: Mutex<ChannelGroup>,
    wrist: Mutex<ChannelGroup>,
}

impl SensorStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            phone: Mutex::new(ChannelGroup::new(PHONE_FIELDS.len(), capacity)),
            wrist: Mutex::new(ChannelGroup::new(WRIST_FIELDS.len(), capacity)),
        }
    }

    // ChannelGroup::append cannot panic mid-update, so a poisoned group is
    // still consistent.
    fn group(&self, kind: GroupKind) -> MutexGuard<'_, ChannelGroup> {
        let mutex = match kind {
            GroupKind::Phone => &self.phone,
            GroupKind::Wrist => &self.wrist,
        };
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offer one sample to a group; see `ChannelGroup::append`
    pub fn append(&self, kind: GroupKind, time: i64, values: &[f64]) -> Append {
        self.group(kind).append(time, values)
    }

    pub fn snapshot(&self, kind: GroupKind) -> GroupSnapshot {
        self.group(kind).snapshot()
    }

    pub fn is_empty(&self, kind: GroupKind) -> bool {
        self.group(kind).is_empty()
    }

    pub fn len(&self, kind: GroupKind) -> usize {
        self.group(kind).len()
    }
}
