//! core::store
//!
//! JSON persistence for modlist snapshots and changelogs.
//!
//! # Layout
//!
//! Rooted at a directory:
//!
//! ```text
//! <root>/snapshots/<label>.json     one modlist per saved version label
//! <root>/changelogs/<uuid>.json     one file per changelog
//! ```
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so a crash never leaves a half-written document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use super::changelog::Changelog;
use super::modlist::Modlist;

/// Errors from snapshot/changelog storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No snapshot or changelog under the requested key.
    #[error("not found: {0}")]
    NotFound(String),

    /// Snapshot labels become filenames; path separators and traversal
    /// sequences are rejected.
    #[error("invalid snapshot label: {0:?}")]
    InvalidLabel(String),

    /// Stored document failed to parse.
    #[error("failed to parse stored document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Directory-rooted store for modlist snapshots and changelogs.
///
/// # Example
///
/// ```no_run
/// use packnote::core::store::SnapshotStore;
/// use packnote::core::types::ModEntry;
///
/// let store = SnapshotStore::open("./packnote-data")?;
/// store.save_snapshot("v1.0", &vec![ModEntry::new("JEI", "11.5.0")])?;
/// let list = store.load_snapshot("v1.0")?;
/// assert_eq!(list.len(), 1);
/// # Ok::<(), packnote::core::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join("snapshots"))?;
        fs::create_dir_all(root.join("changelogs"))?;
        Ok(Self { root })
    }

    /// Save a modlist snapshot under a version label.
    pub fn save_snapshot(&self, label: &str, modlist: &Modlist) -> Result<(), StoreError> {
        let path = self.snapshot_path(label)?;
        write_json_atomic(&path, modlist)
    }

    /// Load the snapshot saved under `label`.
    pub fn load_snapshot(&self, label: &str) -> Result<Modlist, StoreError> {
        let path = self.snapshot_path(label)?;
        read_json(&path, label)
    }

    /// Labels of all saved snapshots, sorted.
    pub fn list_snapshots(&self) -> Result<Vec<String>, StoreError> {
        list_stems(&self.root.join("snapshots"))
    }

    /// Persist a changelog, keyed by its id.
    pub fn save_changelog(&self, changelog: &Changelog) -> Result<(), StoreError> {
        let path = self.changelog_path(changelog.id);
        write_json_atomic(&path, changelog)
    }

    /// Load a changelog by id.
    pub fn load_changelog(&self, id: Uuid) -> Result<Changelog, StoreError> {
        read_json(&self.changelog_path(id), &id.to_string())
    }

    /// Ids of all saved changelogs, sorted.
    pub fn list_changelogs(&self) -> Result<Vec<Uuid>, StoreError> {
        let stems = list_stems(&self.root.join("changelogs"))?;
        Ok(stems
            .iter()
            .filter_map(|s| Uuid::parse_str(s).ok())
            .collect())
    }

    /// Delete a changelog by id. Returns whether it existed.
    pub fn delete_changelog(&self, id: Uuid) -> Result<bool, StoreError> {
        match fs::remove_file(self.changelog_path(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn snapshot_path(&self, label: &str) -> Result<PathBuf, StoreError> {
        if label.is_empty()
            || label.contains(['/', '\\'])
            || label.contains("..")
            || label.starts_with('.')
        {
            return Err(StoreError::InvalidLabel(label.to_string()));
        }
        Ok(self.root.join("snapshots").join(format!("{}.json", label)))
    }

    fn changelog_path(&self, id: Uuid) -> PathBuf {
        self.root.join("changelogs").join(format!("{}.json", id))
    }
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, key: &str) -> Result<T, StoreError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&data)?)
}

fn list_stems(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diff::diff;
    use crate::core::types::ModEntry;

    fn store() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn snapshot_roundtrip() {
        let (_dir, store) = store();
        let list = vec![ModEntry::new("JEI", "11.5.0")];
        store.save_snapshot("v1.0", &list).unwrap();
        assert_eq!(store.load_snapshot("v1.0").unwrap(), list);
        assert_eq!(store.list_snapshots().unwrap(), vec!["v1.0"]);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.load_snapshot("nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn labels_with_separators_are_rejected() {
        let (_dir, store) = store();
        let list = Vec::new();
        assert!(matches!(
            store.save_snapshot("../escape", &list),
            Err(StoreError::InvalidLabel(_))
        ));
        assert!(matches!(
            store.save_snapshot("a/b", &list),
            Err(StoreError::InvalidLabel(_))
        ));
        assert!(matches!(
            store.save_snapshot("", &list),
            Err(StoreError::InvalidLabel(_))
        ));
    }

    #[test]
    fn changelog_roundtrip_and_listing() {
        let (_dir, store) = store();
        let base = vec![ModEntry::new("A", "1.0")];
        let target = vec![ModEntry::new("A", "1.1")];
        let mut changelog = Changelog::new(diff(&base, &target), "v1", "v2");
        changelog.set_note("A", "bumped");

        store.save_changelog(&changelog).unwrap();
        let loaded = store.load_changelog(changelog.id).unwrap();
        assert_eq!(loaded, changelog);
        assert_eq!(store.list_changelogs().unwrap(), vec![changelog.id]);

        assert!(store.delete_changelog(changelog.id).unwrap());
        assert!(!store.delete_changelog(changelog.id).unwrap());
    }
}
