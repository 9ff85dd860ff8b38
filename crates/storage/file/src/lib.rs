//! Snapshot files for the address book: the whole ordered record sequence
//! serialized as one JSON document, written atomically, round-tripping every
//! field including unset optionals.

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use abook_core::{Record, Snapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fixed extension marking the snapshot format.
pub const SNAPSHOT_EXTENSION: &str = "abk";

/// Format version written into every snapshot. The reference contract has
/// no version tag; this one exists defensively.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid file format, expected the '.{SNAPSHOT_EXTENSION}' extension")]
    BadExtension,
    #[error("the file is empty")]
    EmptyFile,
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
    #[error("serde error: {0}")]
    Serde(String),
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    records: Vec<Record>,
}

/// JSON-on-disk implementation of the [`Snapshot`] seam.
#[derive(Debug, Default)]
pub struct JsonSnapshot;

impl JsonSnapshot {
    pub fn new() -> Self {
        Self
    }

    fn with_extension(path: &Path) -> PathBuf {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == SNAPSHOT_EXTENSION => path.to_path_buf(),
            _ => {
                let mut named = path.as_os_str().to_os_string();
                named.push(".");
                named.push(SNAPSHOT_EXTENSION);
                PathBuf::from(named)
            }
        }
    }
}

impl Snapshot for JsonSnapshot {
    type Error = SnapshotError;

    fn save(&self, path: &Path, records: &[Record]) -> Result<PathBuf, Self::Error> {
        let path = Self::with_extension(path);
        let payload = SnapshotFile {
            version: SNAPSHOT_VERSION,
            records: records.to_vec(),
        };
        let data =
            serde_json::to_vec_pretty(&payload).map_err(|e| SnapshotError::Serde(e.to_string()))?;
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let tmp = dir
            .unwrap_or_else(|| Path::new("."))
            .join(format!(".tmp-{}-{}.abk", std::process::id(), unique_suffix()));
        write_atomic(&tmp, &path, &data)?;
        debug!(path = %path.display(), records = records.len(), "snapshot saved");
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<Vec<Record>, Self::Error> {
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
            return Err(SnapshotError::BadExtension);
        }
        let mut data = String::new();
        File::open(path)
            .map_err(|e| SnapshotError::Io(e.to_string()))?
            .read_to_string(&mut data)
            .map_err(|e| SnapshotError::Io(e.to_string()))?;
        if data.is_empty() {
            return Err(SnapshotError::EmptyFile);
        }
        let payload: SnapshotFile =
            serde_json::from_str(&data).map_err(|e| SnapshotError::Serde(e.to_string()))?;
        if payload.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(payload.version));
        }
        debug!(path = %path.display(), records = payload.records.len(), "snapshot loaded");
        Ok(payload.records)
    }
}

/// Dated default file stem, `abook-YYYY-MM-DD`.
pub fn default_snapshot_stem() -> String {
    format!("abook-{}", chrono::Local::now().format("%Y-%m-%d"))
}

fn write_atomic(tmp: &Path, final_path: &Path, data: &[u8]) -> Result<(), SnapshotError> {
    {
        let mut f = File::create(tmp).map_err(|e| SnapshotError::Io(e.to_string()))?;
        f.write_all(data)
            .map_err(|e| SnapshotError::Io(e.to_string()))?;
        f.sync_all().map_err(|e| SnapshotError::Io(e.to_string()))?;
    }
    fs::rename(tmp, final_path).map_err(|e| SnapshotError::Io(e.to_string()))?;
    if let Some(dir) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir_file = File::open(dir).map_err(|e| SnapshotError::Io(e.to_string()))?;
        dir_file
            .sync_all()
            .map_err(|e| SnapshotError::Io(e.to_string()))?;
    }
    Ok(())
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use abook_core::{AddressBook, Field, Matches, PhoneRegion};

    fn sample_records() -> Vec<Record> {
        let mut roy =
            Record::new("roy", "batty", "nexus6@gmail.com", "668678678", PhoneRegion::Pl).unwrap();
        roy.set_city("los angeles");
        roy.set_street("baker street 10").unwrap();
        roy.set_birthday("8-1-2016").unwrap();
        // Ellen keeps every optional field unset.
        let ellen = Record::new(
            "ellen",
            "ripley",
            "jkowalski78@onet.pl",
            "425980912",
            PhoneRegion::Pl,
        )
        .unwrap();
        vec![roy, ellen]
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new();
        let records = sample_records();

        let written = snapshot.save(&dir.path().join("contacts"), &records).unwrap();
        assert_eq!(
            written.extension().and_then(|e| e.to_str()),
            Some(SNAPSHOT_EXTENSION)
        );

        let loaded = snapshot.load(&written).unwrap();
        assert_eq!(loaded.len(), 2);
        let (roy, ellen) = (&loaded[0], &loaded[1]);
        assert_eq!(roy.person_id(), "Batty_Roy");
        assert_eq!(roy.city(), Some("Los Angeles"));
        assert_eq!(roy.street_name(), Some("Baker St."));
        assert_eq!(roy.street_number(), Some("10"));
        assert_eq!(roy.birthday().map(|d| d.to_string()), Some("2016-01-08".into()));
        assert_eq!(roy.phone_display(), "668678678");
        assert_eq!(ellen.person_id(), "Ripley_Ellen");
        assert!(ellen.birthday().is_none());
        assert!(ellen.city().is_none());
        assert!(ellen.street_name().is_none());
    }

    #[test]
    fn book_binds_to_the_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new();
        let mut book = AddressBook::new();
        book.extend(sample_records());

        book.save(&snapshot, &dir.path().join("contacts")).unwrap();
        book.save_changes(&snapshot).unwrap();

        let mut reopened = AddressBook::open(&snapshot, book.file().unwrap()).unwrap();
        assert_eq!(reopened.how_many(), 2);
        match reopened.find_by(&[(Field::Surname, "batty")]).unwrap() {
            Matches::One(found) => assert_eq!(found.phone(), "668678678"),
            other => panic!("expected One, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_wrong_extension_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new();

        let stray = dir.path().join("contacts.txt");
        fs::write(&stray, "{}").unwrap();
        assert!(matches!(
            snapshot.load(&stray),
            Err(SnapshotError::BadExtension)
        ));

        let empty = dir.path().join("contacts.abk");
        fs::write(&empty, "").unwrap();
        assert!(matches!(snapshot.load(&empty), Err(SnapshotError::EmptyFile)));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new();
        let path = dir.path().join("contacts.abk");
        fs::write(&path, r#"{"version": 99, "records": []}"#).unwrap();
        assert!(matches!(
            snapshot.load(&path),
            Err(SnapshotError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn default_stem_is_dated() {
        let stem = default_snapshot_stem();
        assert!(stem.starts_with("abook-"));
        assert_eq!(stem.len(), "abook-".len() + 10);
    }
}
