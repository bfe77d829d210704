use parking_lot::Mutex;

use super::{OverrideSet, OverrideStore, StoreError};

/// Override store held entirely in memory.
///
/// Backs tests and ephemeral runs where nothing should touch the
/// filesystem; implements the same contract as [`super::JsonFileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
  set: Mutex<OverrideSet>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl OverrideStore for MemoryStore {
  fn load(&self) -> OverrideSet {
    self.set.lock().clone()
  }

  fn save(&self, set: &OverrideSet) -> Result<(), StoreError> {
    *self.set.lock() = set.clone();
    Ok(())
  }
}
