//! # Render Adapter Module
//!
//! Turns store snapshots into chart-ready series once per UI tick.
//!
//! While recording is idle a tick yields `RenderUpdate::NoChange` and the
//! previously drawn charts stay on screen. While active, each channel group
//! is snapshotted under its lock and converted into one labeled series per
//! field plus axis ranges. Nothing here writes to the store.

use crate::hub::SensorHub;
use crate::store::GroupKind;
use crate::timeseries::GroupSnapshot;

/// Chart refresh interval
pub const UPDATE_FREQ_MS: u64 = 100;

const PHONE_LABELS: &[&str] = &["X", "Y", "Z"];

/// One line on a chart: (timestamp µs, value) pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub points: Vec<(i64, f64)>,
}

/// Everything a chart widget needs to draw one channel group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFrame {
    pub series: Vec<Series>,
    /// Unset while the group is empty
    pub x_range: Option<(i64, i64)>,
    /// Unset while the group is empty
    pub y_range: Option<(f64, f64)>,
}

impl ChartFrame {
    pub fn from_snapshot(snapshot: &GroupSnapshot, labels: &[&'static str]) -> Self {
        let series = snapshot
            .fields
            .iter()
            .zip(labels)
            .map(|(values, &label)| Series {
                label,
                points: snapshot.times.iter().copied().zip(values.iter().copied()).collect(),
            })
            .collect();

        Self {
            series,
            x_range: snapshot.time_range(),
            y_range: snapshot.value_range(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_range.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// Recording idle: keep whatever is on screen
    NoChange,
    Frames { phone: ChartFrame, wrist: ChartFrame },
}

pub fn labels(kind: GroupKind) -> &'static [&'static str] {
    match kind {
        GroupKind::Phone => PHONE_LABELS,
        GroupKind::Wrist => kind.field_names(),
    }
}

/// Build this tick's chart frames
pub fn refresh(hub: &SensorHub) -> RenderUpdate {
    if !hub.recording.is_active() {
        return RenderUpdate::NoChange;
    }

    let frame = |kind: GroupKind| ChartFrame::from_snapshot(&hub.store.snapshot(kind), labels(kind));

    RenderUpdate::Frames {
        phone: frame(GroupKind::Phone),
        wrist: frame(GroupKind::Wrist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingStatus;

    #[test]
    fn test_idle_is_no_change() {
        let hub = SensorHub::new(10, RecordingStatus::Idle);
        hub.store.append(GroupKind::Phone, 1, &[1.0, 2.0, 3.0]);
        assert_eq!(refresh(&hub), RenderUpdate::NoChange);
    }

    #[test]
    fn test_empty_groups_leave_ranges_unset() {
        let hub = SensorHub::new(10, RecordingStatus::Active);

        let RenderUpdate::Frames { phone, wrist } = refresh(&hub) else {
            panic!("expected frames while recording");
        };

        assert!(phone.is_empty());
        assert_eq!(phone.y_range, None);
        assert_eq!(phone.series.len(), 3);
        assert!(phone.series.iter().all(|s| s.points.is_empty()));
        assert_eq!(wrist.series.len(), 13);
    }

    #[test]
    fn test_frame_series_and_ranges() {
        let hub = SensorHub::new(10, RecordingStatus::Active);
        hub.store.append(GroupKind::Phone, 100, &[0.5, -1.0, 9.8]);
        hub.store.append(GroupKind::Phone, 200, &[0.7, -3.5, 9.6]);

        let RenderUpdate::Frames { phone, wrist } = refresh(&hub) else {
            panic!("expected frames while recording");
        };

        let labels: Vec<_> = phone.series.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["X", "Y", "Z"]);
        assert_eq!(phone.series[1].points, vec![(100, -1.0), (200, -3.5)]);
        assert_eq!(phone.x_range, Some((100, 200)));
        assert_eq!(phone.y_range, Some((-3.5, 9.8)));
        assert!(wrist.is_empty());
    }

    #[test]
    fn test_refresh_does_not_mutate_store() {
        let hub = SensorHub::new(10, RecordingStatus::Active);
        hub.store.append(GroupKind::Phone, 1, &[1.0, 2.0, 3.0]);
        let before = hub.store.snapshot(GroupKind::Phone);

        refresh(&hub);
        refresh(&hub);

        assert_eq!(hub.store.snapshot(GroupKind::Phone), before);
    }
}
