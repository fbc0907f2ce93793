//! Persistence collaborator - where save records live
//!
//! The engine only needs list/save/delete of opaque JSON strings keyed by
//! record id. Stores never interpret the JSON; parsing and validation happen
//! in [`crate::saves::SaveLibrary`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A raw record as it sits in a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub json: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("no record with id {0:?}")]
    NotFound(String),
    #[error("invalid record id {0:?}")]
    InvalidId(String),
}

pub trait SaveStore {
    /// All records, ordered by id
    fn list(&self) -> Result<Vec<StoredRecord>, StoreError>;
    /// Create or overwrite
    fn save(&mut self, id: &str, json: &str) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Ids become file names, so keep them to a safe alphabet
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

/// In-memory store with switchable failures
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert without validation (simulates corrupted or foreign records)
    pub fn insert_raw(&mut self, id: &str, json: &str) {
        self.records.insert(id.to_string(), json.to_string());
    }

    /// Make every save and delete fail, as a full disk would
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.records.get(id).map(String::as_str)
    }
}

impl SaveStore for MemoryStore {
    fn list(&self) -> Result<Vec<StoredRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self
            .records
            .iter()
            .map(|(id, json)| StoredRecord {
                id: id.clone(),
                json: json.clone(),
            })
            .collect())
    }

    fn save(&mut self, id: &str, json: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        self.records.insert(id.to_string(), json.to_string());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        match self.records.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

/// One `<id>.json` file per record under a directory
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// The directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl SaveStore for JsonDirStore {
    fn list(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(json) => records.push(StoredRecord {
                    id: id.to_string(),
                    json,
                }),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable save"),
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn save(&mut self, id: &str, json: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        fs::create_dir_all(&self.dir)?;
        // temp file, then rename into place
        let tmp = self.dir.join(format!(".{id}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.path_for(id))?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        validate_id(id)?;
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tui-jigsaw-store-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn ids_are_restricted() {
        assert!(validate_id("save-1_a").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../etc").is_err());
        assert!(validate_id("a b").is_err());
    }

    #[test]
    fn memory_store_roundtrip_and_faults() {
        let mut store = MemoryStore::new();
        store.save("b", "{}").unwrap();
        store.save("a", "[]").unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        store.set_fail_writes(true);
        assert!(matches!(store.save("c", "{}"), Err(StoreError::Unavailable(_))));
        assert!(store.delete("a").is_err());
        assert_eq!(store.len(), 2);

        store.set_fail_writes(false);
        store.delete("a").unwrap();
        assert!(matches!(store.delete("a"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn dir_store_missing_dir_lists_empty() {
        let store = JsonDirStore::new(scratch_dir("missing"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn dir_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = JsonDirStore::new(&dir);
        store.save("one", "{\"a\":1}").unwrap();
        store.save("two", "{\"a\":2}").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "one");
        assert_eq!(records[0].json, "{\"a\":1}");

        store.delete("one").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(matches!(store.delete("one"), Err(StoreError::NotFound(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
