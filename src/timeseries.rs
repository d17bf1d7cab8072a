//! # Bounded Time Series Module
//!
//! Fixed-capacity, co-indexed buffers for one physical sensor source.
//! A `ChannelGroup` holds a timestamp buffer plus one value buffer per
//! named field, and every buffer grows and evicts in lockstep.
//!
//! ## Invariants
//! - Timestamps are strictly increasing in insertion order
//! - `times.len() == fields[i].len()` for every field
//! - Length never exceeds the capacity given at construction
//!
//! ## Time Unit
//! Timestamps are microseconds since the Unix epoch (`i64`).

use std::collections::VecDeque;

/// Samples retained per channel group
pub const BUFFER_CAPACITY: usize = 1000;

/// Result of offering a sample to a channel group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Append {
    /// Sample stored (possibly after evicting the oldest one)
    Stored,
    /// Timestamp not strictly after the newest stored sample; dropped
    OutOfOrder,
    /// Wrong number of field values for this group; dropped
    FieldCountMismatch,
}

/// Min/max helpers for value slices
pub trait ValueSliceExt {
    fn min_max(&self) -> Option<(f64, f64)>;
}

impl ValueSliceExt for [f64] {
    fn min_max(&self) -> Option<(f64, f64)> {
        self.iter().fold(None, |acc, &value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
    }
}

/// Co-indexed ring buffers: one timestamp buffer and N field buffers
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    capacity: usize,
    times: VecDeque<i64>,
    fields: Vec<VecDeque<f64>>,
}

impl ChannelGroup {
    pub fn new(field_count: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            times: VecDeque::with_capacity(capacity),
            fields: (0..field_count)
                .map(|_| VecDeque::with_capacity(capacity))
                .collect(),
        }
    }

    /// Append a sample if its timestamp is newer than the last stored one.
    ///
    /// At capacity the oldest sample is evicted from every buffer before the
    /// new one is pushed, so all buffers stay aligned by index.
    pub fn append(&mut self, time: i64, values: &[f64]) -> Append {
        if values.len() != self.fields.len() {
            return Append::FieldCountMismatch;
        }
        if let Some(&last) = self.times.back() {
            if time <= last {
                return Append::OutOfOrder;
            }
        }

        if self.times.len() == self.capacity {
            self.times.pop_front();
            for buffer in self.fields.iter_mut() {
                buffer.pop_front();
            }
        }

        self.times.push_back(time);
        for (buffer, &value) in self.fields.iter_mut().zip(values) {
            buffer.push_back(value);
        }

        Append::Stored
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Owned copy of every buffer
    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            times: self.times.iter().copied().collect(),
            fields: self
                .fields
                .iter()
                .map(|buffer| buffer.iter().copied().collect())
                .collect(),
        }
    }
}

/// Immutable, index-aligned copy of a channel group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSnapshot {
    pub times: Vec<i64>,
    /// One vector per field, each the same length as `times`
    pub fields: Vec<Vec<f64>>,
}

impl GroupSnapshot {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Row `index` as (timestamp, field values)
    pub fn row(&self, index: usize) -> Option<(i64, Vec<f64>)> {
        let time = *self.times.get(index)?;
        let values = self
            .fields
            .iter()
            .map(|field| field.get(index).copied())
            .collect::<Option<Vec<f64>>>()?;
        Some((time, values))
    }

    pub fn rows(&self) -> impl Iterator<Item = (i64, Vec<f64>)> + '_ {
        (0..self.len()).filter_map(move |index| self.row(index))
    }

    /// Oldest and newest timestamp
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Min/max over the union of all field values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.fields
            .iter()
            .filter_map(|field| field.as_slice().min_max())
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(count: i64, capacity: usize) -> ChannelGroup {
        let mut group = ChannelGroup::new(3, capacity);
        for t in 1..=count {
            assert_eq!(group.append(t, &[t as f64, 0.0, -(t as f64)]), Append::Stored);
        }
        group
    }

    #[test]
    fn test_len_tracks_appends_below_capacity() {
        let group = filled(7, 10);
        assert_eq!(group.len(), 7);
        assert_eq!(group.snapshot().time_range(), Some((1, 7)));
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let group = filled(13, 10);
        let snapshot = group.snapshot();

        assert_eq!(group.len(), 10);
        assert_eq!(snapshot.times, (4..=13).collect::<Vec<i64>>());
        assert_eq!(snapshot.fields[0], (4..=13).map(|t| t as f64).collect::<Vec<f64>>());
        assert_eq!(snapshot.fields[2].first(), Some(&-4.0));
        for field in &snapshot.fields {
            assert_eq!(field.len(), 10);
        }
    }

    #[test]
    fn test_default_capacity_eviction() {
        let group = filled(BUFFER_CAPACITY as i64 + 5, BUFFER_CAPACITY);
        let snapshot = group.snapshot();
        assert_eq!(snapshot.len(), BUFFER_CAPACITY);
        assert_eq!(snapshot.times.first(), Some(&6));
    }

    #[test]
    fn test_out_of_order_and_duplicate_are_dropped() {
        let mut group = filled(5, 10);
        let before = group.snapshot();

        assert_eq!(group.append(5, &[9.0, 9.0, 9.0]), Append::OutOfOrder);
        assert_eq!(group.append(2, &[9.0, 9.0, 9.0]), Append::OutOfOrder);
        assert_eq!(group.snapshot(), before);
    }

    #[test]
    fn test_field_count_mismatch_is_dropped() {
        let mut group = ChannelGroup::new(3, 10);
        assert_eq!(group.append(1, &[1.0, 2.0]), Append::FieldCountMismatch);
        assert!(group.is_empty());
    }

    #[test]
    fn test_snapshot_rows_and_ranges() {
        let mut group = ChannelGroup::new(2, 10);
        group.append(10, &[1.5, -2.0]);
        group.append(20, &[4.0, 0.5]);

        let snapshot = group.snapshot();
        let rows: Vec<_> = snapshot.rows().collect();

        assert_eq!(rows, vec![(10, vec![1.5, -2.0]), (20, vec![4.0, 0.5])]);
        assert_eq!(snapshot.time_range(), Some((10, 20)));
        assert_eq!(snapshot.value_range(), Some((-2.0, 4.0)));
    }

    #[test]
    fn test_empty_snapshot_has_no_ranges() {
        let snapshot = ChannelGroup::new(3, 10).snapshot();
        assert_eq!(snapshot.time_range(), None);
        assert_eq!(snapshot.value_range(), None);
        assert_eq!(snapshot.rows().count(), 0);
    }
}
