//! JSON file helpers
//!
//! Every file the tool owns is written through [`write_json_atomic`]: the
//! data goes to a sibling `.tmp` file which is then renamed over the target.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::error::{CommitmentError, CommitmentResult};

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> CommitmentError {
    CommitmentError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> CommitmentResult<T> {
    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Read JSON from `path`, or `T::default()` when the file does not exist
pub fn read_json<T, P>(path: P) -> CommitmentResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }
    parse_file(path)
}

/// Read JSON from `path`, failing when the file does not exist
pub fn read_json_required<T, P>(path: P) -> CommitmentResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(CommitmentError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }
    parse_file(path)
}

/// Read JSON from `path`, falling back to `fallback` when the file is absent
/// or cannot be parsed
///
/// A parse failure is logged and otherwise ignored. I/O errors other than
/// a missing file still propagate.
pub fn read_json_or<T, P>(path: P, fallback: impl FnOnce() -> T) -> CommitmentResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(fallback());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable data file, using defaults");
            Ok(fallback())
        }
    }
}

/// Write JSON to `path` atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> CommitmentResult<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}

/// Remove `path` if it exists
pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> CommitmentResult<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path).map_err(|e| storage_error("remove", path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Prefs {
        label: String,
        enabled: bool,
    }

    fn sample() -> Prefs {
        Prefs {
            label: "prefill".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_missing_file_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let prefs: Prefs = read_json(temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(prefs, Prefs::default());
    }

    #[test]
    fn test_write_then_read_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(!temp_dir.path().join("nested").join("prefs.json.tmp").exists());
        assert_eq!(read_json::<Prefs, _>(&path).unwrap(), sample());
        assert_eq!(read_json_required::<Prefs, _>(&path).unwrap(), sample());
    }

    #[test]
    fn test_required_fails_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_json_required::<Prefs, _>(temp_dir.path().join("admin.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(read_json::<Prefs, _>(&path).is_err());
        let prefs = read_json_or(&path, sample).unwrap();
        assert_eq!(prefs, sample());
    }

    #[test]
    fn test_remove_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        remove_if_exists(&path).unwrap();

        write_json_atomic(&path, &sample()).unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
