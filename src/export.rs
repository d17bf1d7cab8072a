//! # Recording Export Module
//!
//! Writes the buffered samples to CSV when the user presses "Save Recording".
//!
//! ## File Layout
//! ```text
//! {participant}_{category}_{MonDD_HHMMhr}.csv          phone accelerometer
//! {participant}_{category}_{MonDD_HHMMhr}_wrist.csv    wrist motion (only if any)
//!
//! time,accel_x,accel_y,accel_z
//! 2024-03-05 09:07:12.345678,0.12,9.79,0.03
//! ```
//!
//! ## Rules
//! - Saving is refused while recording is active
//! - Participant id and category must be 1-64 of `[A-Za-z0-9_-]`
//! - Existing files are never overwritten; a clashing name gets a random
//!   `_xxxxxxxx` suffix before `.csv`

use crate::error::ExportError;
use crate::recording::RecordingStatus;
use crate::sensor::local_time;
use crate::store::{GroupKind, SensorStore};
use crate::timeseries::GroupSnapshot;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PHONE_HEADER: [&str; 4] = ["time", "accel_x", "accel_y", "accel_z"];

const MAX_NAME_PART_LEN: usize = 64;
const NAME_ATTEMPTS: usize = 8;
const SUFFIX_LEN: usize = 8;

const FILE_TIME_FORMAT: &str = "%b%d_%H%Mhr";
const ROW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// What the user entered in the save form
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub participant: &'a str,
    pub category: &'a str,
}

/// Files produced by a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct SavedExport {
    pub phone: PathBuf,
    pub wrist: Option<PathBuf>,
}

impl fmt::Display for SavedExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File saved as: {}", self.phone.display())?;
        if let Some(wrist) = &self.wrist {
            write!(f, " (wrist data: {})", wrist.display())?;
        }
        Ok(())
    }
}

/// Save the current buffers and describe the outcome for the status line
pub fn export_recording(
    store: &SensorStore,
    status: RecordingStatus,
    request: &ExportRequest<'_>,
    output_dir: &Path,
) -> String {
    match save_recording(store, status, request, output_dir, Local::now()) {
        Ok(saved) => {
            log::info!("{}", saved);
            saved.to_string()
        }
        Err(e @ (ExportError::Io(_) | ExportError::Csv(_))) => {
            log::error!("Export failed: {}", e);
            e.to_string()
        }
        Err(e) => e.to_string(),
    }
}

pub fn save_recording(
    store: &SensorStore,
    status: RecordingStatus,
    request: &ExportRequest<'_>,
    output_dir: &Path,
    now: DateTime<Local>,
) -> Result<SavedExport, ExportError> {
    if request.participant.is_empty() {
        return Err(ExportError::EmptyParticipantId);
    }
    if status.is_active() {
        return Err(ExportError::RecordingStillActive);
    }
    if !is_name_part(request.participant) {
        return Err(ExportError::InvalidParticipantId(request.participant.to_string()));
    }
    if !is_name_part(request.category) {
        return Err(ExportError::InvalidCategory(request.category.to_string()));
    }

    fs::create_dir_all(output_dir)?;
    let stem = format!(
        "{}_{}_{}",
        request.participant,
        request.category,
        now.format(FILE_TIME_FORMAT)
    );

    let phone = write_snapshot(
        output_dir,
        &stem,
        &PHONE_HEADER,
        &store.snapshot(GroupKind::Phone),
    )?;

    let wrist_snapshot = store.snapshot(GroupKind::Wrist);
    let wrist = if wrist_snapshot.is_empty() {
        None
    } else {
        let header: Vec<&str> = std::iter::once("time")
            .chain(GroupKind::Wrist.field_names().iter().copied())
            .collect();
        Some(write_snapshot(
            output_dir,
            &format!("{}_wrist", stem),
            &header,
            &wrist_snapshot,
        )?)
    };

    Ok(SavedExport { phone, wrist })
}

/// True for 1-64 ASCII letters, digits, '_' or '-'
fn is_name_part(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_NAME_PART_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn format_row_time(time_us: i64) -> String {
    local_time(time_us)
        .map(|time| time.format(ROW_TIME_FORMAT).to_string())
        .unwrap_or_else(|| time_us.to_string())
}

/// Create `{stem}.csv`, or `{stem}_{suffix}.csv` if that name is taken
fn create_unique(dir: &Path, stem: &str) -> io::Result<(PathBuf, File)> {
    let mut candidate = dir.join(format!("{}.csv", stem));

    for _ in 0..NAME_ATTEMPTS {
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::debug!("{} already exists", candidate.display());
                let token = Uuid::new_v4().simple().to_string();
                candidate = dir.join(format!("{}_{}.csv", stem, &token[..SUFFIX_LEN]));
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {}", stem),
    ))
}

fn write_snapshot(
    dir: &Path,
    stem: &str,
    header: &[&str],
    snapshot: &GroupSnapshot,
) -> Result<PathBuf, ExportError> {
    let (path, file) = create_unique(dir, stem)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(header)?;
    for (time, values) in snapshot.rows() {
        let record: Vec<String> = std::iter::once(format_row_time(time))
            .chain(values.iter().map(f64::to_string))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    const REQUEST: ExportRequest<'static> = ExportRequest {
        participant: "P01",
        category: "BASMI",
    };

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap()
    }

    fn sample_store() -> SensorStore {
        let store = SensorStore::new(10);
        for (t, x) in [(1, 0.1), (2, 0.2), (3, 0.3)] {
            store.append(GroupKind::Phone, t, &[x, 1.0, 9.0]);
        }
        store
    }

    fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader.headers().unwrap().iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    fn dir_is_empty(dir: &Path) -> bool {
        !dir.exists() || fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_round_trip_phone_samples() {
        let dir = tempdir().unwrap();
        let saved = save_recording(&sample_store(), RecordingStatus::Idle, &REQUEST, dir.path(), fixed_now()).unwrap();

        assert_eq!(saved.phone, dir.path().join("P01_BASMI_Mar05_0907hr.csv"));
        assert_eq!(saved.wrist, None);

        let (header, rows) = read_rows(&saved.phone);
        assert_eq!(header, vec!["time", "accel_x", "accel_y", "accel_z"]);
        assert_eq!(rows.len(), 3);

        let expected = [(1, 0.1), (2, 0.2), (3, 0.3)];
        for (row, (t, x)) in rows.iter().zip(expected) {
            assert_eq!(row[0], format_row_time(t));
            assert_eq!(row[1].parse::<f64>().unwrap(), x);
            assert_eq!(row[2].parse::<f64>().unwrap(), 1.0);
            assert_eq!(row[3].parse::<f64>().unwrap(), 9.0);
        }
    }

    #[test]
    fn test_collision_gets_unique_name() {
        let dir = tempdir().unwrap();
        let store = sample_store();

        let first = save_recording(&store, RecordingStatus::Idle, &REQUEST, dir.path(), fixed_now()).unwrap();
        let second = save_recording(&store, RecordingStatus::Idle, &REQUEST, dir.path(), fixed_now()).unwrap();

        assert_ne!(first.phone, second.phone);
        let second_name = second.phone.file_name().unwrap().to_str().unwrap();
        assert!(second_name.starts_with("P01_BASMI_Mar05_0907hr_"));
        assert!(second_name.ends_with(".csv"));

        assert_eq!(read_rows(&first.phone), read_rows(&second.phone));
        assert_eq!(read_rows(&first.phone).1.len(), 3);
    }

    #[test]
    fn test_active_recording_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let result = save_recording(&sample_store(), RecordingStatus::Active, &REQUEST, &out, fixed_now());

        assert!(matches!(result, Err(ExportError::RecordingStillActive)));
        assert!(dir_is_empty(&out));

        let status = export_recording(&sample_store(), RecordingStatus::Active, &REQUEST, &out);
        assert!(status.starts_with("File not saved"));
        assert!(dir_is_empty(&out));
    }

    #[test]
    fn test_empty_participant_checked_first() {
        let dir = tempdir().unwrap();
        let request = ExportRequest { participant: "", category: "not valid!" };

        for status in [RecordingStatus::Idle, RecordingStatus::Active] {
            let message = export_recording(&sample_store(), status, &request, dir.path());
            assert_eq!(message, "Participant number not entered");
        }
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let dir = tempdir().unwrap();
        let store = sample_store();
        let too_long = "x".repeat(65);

        for participant in ["P 01", "../P01", "P01.csv", too_long.as_str()] {
            let request = ExportRequest { participant, category: "BASMI" };
            assert!(matches!(
                save_recording(&store, RecordingStatus::Idle, &request, dir.path(), fixed_now()),
                Err(ExportError::InvalidParticipantId(_))
            ));
        }

        for category in ["", "a/b", "ASPI;"] {
            let request = ExportRequest { participant: "P01", category };
            assert!(matches!(
                save_recording(&store, RecordingStatus::Idle, &request, dir.path(), fixed_now()),
                Err(ExportError::InvalidCategory(_))
            ));
        }

        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_wrist_companion_file() {
        let dir = tempdir().unwrap();
        let store = sample_store();
        store.append(GroupKind::Wrist, 10, &[0.5; 13]);

        let saved = save_recording(&store, RecordingStatus::Idle, &REQUEST, dir.path(), fixed_now()).unwrap();
        let wrist = saved.wrist.clone().unwrap();

        assert_eq!(wrist, dir.path().join("P01_BASMI_Mar05_0907hr_wrist.csv"));
        let (header, rows) = read_rows(&wrist);
        assert_eq!(header.len(), 14);
        assert_eq!(header[1], "rotationRateX");
        assert_eq!(header[13], "quaternionZ");
        assert_eq!(rows.len(), 1);
        assert!(saved.to_string().contains("wrist data"));
    }

    #[test]
    fn test_empty_store_writes_header_only() {
        let dir = tempdir().unwrap();
        let saved = save_recording(&SensorStore::new(10), RecordingStatus::Idle, &REQUEST, dir.path(), fixed_now()).unwrap();

        let (header, rows) = read_rows(&saved.phone);
        assert_eq!(header, vec!["time", "accel_x", "accel_y", "accel_z"]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_status_text_names_the_file() {
        let dir = tempdir().unwrap();
        let message = export_recording(&sample_store(), RecordingStatus::Idle, &REQUEST, dir.path());
        assert!(message.starts_with("File saved as: "));
        assert!(message.contains("P01_BASMI_"));
    }
}
