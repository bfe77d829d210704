//! Local override persistence.
//!
//! Overrides are the only writable state in the application: records
//! created, edited or deleted locally. The whole set is persisted as a
//! single JSON document. Reads fail soft (a missing or unparseable
//! document is the empty set); writes replace the document and propagate
//! failures to the caller.

mod json;
mod memory;
mod set;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use set::{OverrideRecord, OverrideSet};

use thiserror::Error;

use crate::directory::types::UserPatch;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to write override document: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize override document: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Persistence backend for the override set.
///
/// Backends only move whole documents; the record-level operations are
/// read-modify-write over [`OverrideSet`] and shared across backends.
pub trait OverrideStore: Send + Sync {
  /// Read the persisted set. Never fails: anything unreadable or
  /// unparseable degrades to the empty set.
  fn load(&self) -> OverrideSet;

  /// Replace the persisted set.
  fn save(&self, set: &OverrideSet) -> Result<(), StoreError>;

  fn find_by_id(&self, id: &str) -> Option<OverrideRecord> {
    self.load().find(id).cloned()
  }

  /// Shallow-merge `patch` into the record with `id`, or append a new
  /// record. Clears any tombstone for `id`.
  fn upsert(&self, id: &str, patch: UserPatch) -> Result<(), StoreError> {
    let mut set = self.load();
    set.upsert(id, patch);
    self.save(&set)
  }

  /// Drop any override for `id` and record a tombstone for it.
  fn remove(&self, id: &str) -> Result<(), StoreError> {
    let mut set = self.load();
    set.remove(id);
    self.save(&set)
  }
}
