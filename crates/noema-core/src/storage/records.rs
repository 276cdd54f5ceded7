//! Single-record JSON file IO with the locking discipline shared by every
//! store: exclusive lock for writes, shared lock for reads. Atomicity is
//! per record, per process.

use std::fs::{self, OpenOptions};
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(value)?;
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    fs2::FileExt::lock_exclusive(&file)?;
    (&file).write_all(json.as_bytes())?;
    fs2::FileExt::unlock(&file)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let file = OpenOptions::new().read(true).open(path)?;
    fs2::FileExt::lock_shared(&file)?;
    let mut data = String::new();
    (&file).read_to_string(&mut data)?;
    fs2::FileExt::unlock(&file)?;
    serde_json::from_str(&data).map_err(|err| CoreError::MalformedRecord {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// JSON record files in a directory, sorted by file name so listing (and
/// therefore search tie-breaking) is deterministic.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.json");

        write_json(&path, &json!({"a": 1})).unwrap();
        let value: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_write_truncates_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("record.json");

        write_json(&path, &json!({"long": "aaaaaaaaaaaaaaaaaaaaaaaa"})).unwrap();
        write_json(&path, &json!({"s": 1})).unwrap();
        let value: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"s": 1}));
    }

    #[test]
    fn test_read_malformed_is_reported_as_such() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn test_list_json_files_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.json"), "{}").unwrap();
        fs::write(tmp.path().join("a.json"), "{}").unwrap();
        fs::write(tmp.path().join("ignore.txt"), "").unwrap();

        let files = list_json_files(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
