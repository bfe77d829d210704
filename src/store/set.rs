use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::directory::types::{User, UserPatch};

/// A locally persisted, possibly partial user record.
///
/// An override created by editing a remote record carries only the
/// edited fields; the rest fill in from the remote record at merge time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
  pub id: String,
  #[serde(flatten)]
  pub fields: UserPatch,
}

impl OverrideRecord {
  /// Expand into a full record. Fields the override never set stay
  /// empty; callers tolerate such partial records.
  pub fn materialize(&self) -> User {
    let mut user = User {
      id: self.id.clone(),
      ..User::default()
    };
    self.fields.apply_to(&mut user);
    user
  }
}

/// The persisted override document: override records in insertion order,
/// plus the ids deleted locally.
///
/// The deleted set is what keeps a remote-originated delete deleted
/// across restarts; without it, absence from `records` would be the only
/// trace and the remote record would resurface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSet {
  #[serde(default)]
  pub records: Vec<OverrideRecord>,
  #[serde(default)]
  pub deleted: BTreeSet<String>,
}

impl OverrideSet {
  pub fn find(&self, id: &str) -> Option<&OverrideRecord> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn is_deleted(&self, id: &str) -> bool {
    self.deleted.contains(id)
  }

  /// Merge `patch` into an existing record or append a new one. An
  /// upsert on a deleted id revives it.
  pub fn upsert(&mut self, id: &str, patch: UserPatch) {
    self.deleted.remove(id);
    match self.records.iter_mut().find(|r| r.id == id) {
      Some(record) => record.fields = record.fields.merged_with(&patch),
      None => self.records.push(OverrideRecord {
        id: id.to_string(),
        fields: patch,
      }),
    }
  }

  /// Drop the override for `id`, if any, and tombstone the id.
  pub fn remove(&mut self, id: &str) {
    self.records.retain(|r| r.id != id);
    self.deleted.insert(id.to_string());
  }
}
