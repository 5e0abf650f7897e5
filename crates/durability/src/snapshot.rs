//! JSON snapshot reader and writer.
//!
//! Format: one JSON object whose keys are dataset keys. The value shape
//! encodes the entry kind:
//!
//! - string entry  → JSON string
//! - list entry    → JSON array of strings
//! - sorted set    → JSON array of `[member, score]` pairs
//!
//! Loading tolerates a missing file (fresh start) and skips values whose
//! shape matches no kind, so snapshots written by builds with more kinds
//! enabled still load. Writing uses the write-fsync-rename pattern: a
//! complete new snapshot becomes visible atomically or not at all.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{SnapshotError, SnapshotResult};

/// Kind-tagged value as it appears in a snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    /// String entry.
    Str(String),
    /// List entry, head first.
    List(Vec<String>),
    /// Sorted-set entry as `(member, score)` pairs.
    Sorted(Vec<(String, f64)>),
}

impl SnapshotValue {
    fn to_json(&self) -> Value {
        match self {
            SnapshotValue::Str(s) => Value::String(s.clone()),
            SnapshotValue::List(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
            }
            SnapshotValue::Sorted(pairs) => Value::Array(
                pairs
                    .iter()
                    .map(|(member, score)| json!([member, score]))
                    .collect(),
            ),
        }
    }

    /// Decode a JSON value into a snapshot value, or `None` when the
    /// shape matches no kind this build can materialise.
    fn from_json(value: &Value) -> Option<SnapshotValue> {
        match value {
            Value::String(s) => Some(SnapshotValue::Str(s.clone())),
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    let list = items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect();
                    return Some(SnapshotValue::List(list));
                }
                let mut pairs = Vec::with_capacity(items.len());
                for item in items {
                    let pair = item.as_array()?;
                    if pair.len() != 2 {
                        return None;
                    }
                    let member = pair[0].as_str()?;
                    let score = pair[1].as_f64()?;
                    pairs.push((member.to_string(), score));
                }
                Some(SnapshotValue::Sorted(pairs))
            }
            _ => None,
        }
    }
}

/// Read a snapshot file into `(key, value)` pairs.
///
/// A missing file yields an empty dataset. Values of unrecognised shape
/// are skipped with a warning; a file that is not a JSON object at all is
/// an error, because it means the snapshot is corrupt rather than merely
/// newer.
pub fn read_snapshot(path: &Path) -> SnapshotResult<Vec<(String, SnapshotValue)>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot file, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let root: Value = serde_json::from_slice(&bytes)?;
    let Value::Object(object) = root else {
        return Err(SnapshotError::NotAnObject);
    };

    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        match SnapshotValue::from_json(&value) {
            Some(decoded) => entries.push((key, decoded)),
            None => warn!(key = %key, "skipping snapshot value of unknown shape"),
        }
    }
    Ok(entries)
}

/// Write `(key, value)` pairs as a snapshot at `path`.
///
/// The document is staged in a dot-prefixed temporary file next to the
/// target, fsynced, then renamed into place; the directory is fsynced
/// afterwards so the rename itself is durable.
pub fn write_snapshot<'a, I>(path: &Path, entries: I) -> SnapshotResult<()>
where
    I: IntoIterator<Item = (&'a str, SnapshotValue)>,
{
    let mut object = Map::new();
    for (key, value) in entries {
        object.insert(key.to_string(), value.to_json());
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "db.json".to_string());
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &Value::Object(object))?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir = File::open(parent)?;
        dir.sync_all()?;
    }

    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<(String, SnapshotValue)> {
        vec![
            ("author".to_string(), SnapshotValue::Str("cch137".into())),
            (
                "list1".to_string(),
                SnapshotValue::List(vec!["a".into(), "b".into(), "c".into()]),
            ),
            (
                "board".to_string(),
                SnapshotValue::Sorted(vec![("alice".into(), 1.5), ("bob".into(), 2.0)]),
            ),
        ]
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let entries = sample_entries();
        write_snapshot(&path, entries.iter().map(|(k, v)| (k.as_str(), v.clone()))).unwrap();

        let mut loaded = read_snapshot(&path).unwrap();
        loaded.sort_by(|a, b| a.0.cmp(&b.0));
        let mut expected = entries;
        expected.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_missing_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = read_snapshot(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(read_snapshot(&path), Err(SnapshotError::Json(_))));

        std::fs::write(&path, b"[1, 2, 3]").unwrap();
        assert!(matches!(
            read_snapshot(&path),
            Err(SnapshotError::NotAnObject)
        ));
    }

    #[test]
    fn test_unknown_shapes_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            br#"{"keep":"v","skip_num":42,"skip_obj":{"a":1},"empty_list":[]}"#,
        )
        .unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(&("keep".to_string(), SnapshotValue::Str("v".into()))));
        // An empty array has no element to disambiguate it; it loads as a list.
        assert!(loaded.contains(&("empty_list".to_string(), SnapshotValue::List(vec![]))));
    }

    #[test]
    fn test_write_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        write_snapshot(&path, [("k", SnapshotValue::Str("one".into()))]).unwrap();
        write_snapshot(&path, [("k", SnapshotValue::Str("two".into()))]).unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(
            loaded,
            vec![("k".to_string(), SnapshotValue::Str("two".into()))]
        );
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        write_snapshot(&path, [("k", SnapshotValue::Str("v".into()))]).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "stale temp files: {leftovers:?}");
    }

    #[test]
    fn test_sorted_pairs_preserve_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        write_snapshot(
            &path,
            [(
                "z",
                SnapshotValue::Sorted(vec![("m".into(), -2.5), ("n".into(), 1e9)]),
            )],
        )
        .unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(
            loaded,
            vec![(
                "z".to_string(),
                SnapshotValue::Sorted(vec![("m".into(), -2.5), ("n".into(), 1e9)])
            )]
        );
    }
}
