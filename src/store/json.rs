use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use color_eyre::{eyre::eyre, Result};
use tracing::warn;

use super::{OverrideSet, OverrideStore, StoreError};

/// Override store persisted as one JSON document on disk.
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  /// Create a store at the default location under the user data
  /// directory.
  pub fn open() -> Result<Self> {
    Ok(Self::at(Self::default_path()?))
  }

  /// Create a store backed by the given file.
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Get the default document path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("userctl").join("overrides.json"))
  }
}

impl OverrideStore for JsonFileStore {
  fn load(&self) -> OverrideSet {
    let raw = match fs::read(&self.path) {
      Ok(raw) => raw,
      Err(e) => {
        if e.kind() != ErrorKind::NotFound {
          warn!(path = %self.path.display(), error = %e, "override document unreadable, treating as empty");
        }
        return OverrideSet::default();
      }
    };

    match serde_json::from_slice(&raw) {
      Ok(set) => set,
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "override document unparseable, treating as empty");
        OverrideSet::default()
      }
    }
  }

  fn save(&self, set: &OverrideSet) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_vec_pretty(set)?;
    fs::write(&self.path, data)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directory::types::UserPatch;

  #[test]
  fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::at(dir.path().join("overrides.json"));

    assert_eq!(store.load(), OverrideSet::default());
  }

  #[test]
  fn corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.json");
    fs::write(&path, b"{ not json").unwrap();

    let store = JsonFileStore::at(&path);
    assert_eq!(store.load(), OverrideSet::default());
  }

  #[test]
  fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::at(dir.path().join("nested").join("overrides.json"));

    let mut set = OverrideSet::default();
    set.upsert(
      "1",
      UserPatch {
        name: Some("Persisted".into()),
        ..UserPatch::default()
      },
    );
    set.remove("2");
    store.save(&set).unwrap();

    assert_eq!(store.load(), set);
  }

  #[test]
  fn save_fails_on_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    // The parent "file" is a plain file, so create_dir_all must fail.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let store = JsonFileStore::at(blocker.join("overrides.json"));
    let err = store.save(&OverrideSet::default()).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
  }
}
