//! Tag-keyed query cache with snapshot-based optimistic patches.
//!
//! Query results are cached under a tag: the merged list under
//! [`Tag::List`], each record under [`Tag::Item`]. Invalidating a tag
//! forces the next read of that tag to refetch. A mutation takes a
//! [`Patch`] snapshot of the tag it is about to touch and either commits
//! (drops the snapshot) or restores it, so a failed write leaves the
//! cache exactly as it was.
//!
//! The cache itself is plain data; callers serialize access (the service
//! keeps it behind a mutex). Access is not atomic across await points,
//! which is accepted for a single-binary, cooperatively-scheduled caller.

use std::collections::HashMap;
use std::fmt;

use crate::directory::types::{User, UserPatch};

/// Label a cached query result is grouped under for invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
  /// The merged user list.
  List,
  /// A single user record.
  Item(String),
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Tag::List => write!(f, "list"),
      Tag::Item(id) => write!(f, "item:{id}"),
    }
  }
}

/// A value cached under a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
  List(Vec<User>),
  Item(User),
}

/// Snapshot of one tag's entry, taken before an optimistic patch.
#[derive(Debug)]
#[must_use = "dropping a patch loses the snapshot needed for rollback"]
pub struct Patch {
  tag: Tag,
  prior: Option<CachedValue>,
}

/// Tag-keyed cache of query results.
#[derive(Debug, Default)]
pub struct TagCache {
  entries: HashMap<Tag, CachedValue>,
}

impl TagCache {
  pub fn get(&self, tag: &Tag) -> Option<&CachedValue> {
    self.entries.get(tag)
  }

  pub fn set(&mut self, tag: Tag, value: CachedValue) {
    self.entries.insert(tag, value);
  }

  /// Drop the entry for `tag`; the next read of it recomputes.
  pub fn invalidate(&mut self, tag: &Tag) {
    self.entries.remove(tag);
  }

  /// The cached merged list, if valid.
  pub fn list(&self) -> Option<&[User]> {
    match self.get(&Tag::List) {
      Some(CachedValue::List(users)) => Some(users),
      _ => None,
    }
  }

  /// The cached record for `id`, if valid.
  pub fn item(&self, id: &str) -> Option<&User> {
    match self.get(&Tag::Item(id.to_string())) {
      Some(CachedValue::Item(user)) => Some(user),
      _ => None,
    }
  }

  /// Take a rollback snapshot of `tag`.
  pub fn snapshot(&self, tag: Tag) -> Patch {
    Patch {
      prior: self.entries.get(&tag).cloned(),
      tag,
    }
  }

  /// Restore a snapshot taken with [`TagCache::snapshot`].
  pub fn restore(&mut self, patch: Patch) {
    match patch.prior {
      Some(value) => {
        self.entries.insert(patch.tag, value);
      }
      None => {
        self.entries.remove(&patch.tag);
      }
    }
  }

  // ==========================================================================
  // Optimistic list edits. Each is a no-op when no list is cached.
  // ==========================================================================

  pub fn push_list_entry(&mut self, user: User) {
    if let Some(CachedValue::List(users)) = self.entries.get_mut(&Tag::List) {
      users.push(user);
    }
  }

  pub fn patch_list_entry(&mut self, id: &str, patch: &UserPatch) {
    if let Some(CachedValue::List(users)) = self.entries.get_mut(&Tag::List) {
      if let Some(user) = users.iter_mut().find(|u| u.id == id) {
        patch.apply_to(user);
      }
    }
  }

  pub fn remove_list_entry(&mut self, id: &str) {
    if let Some(CachedValue::List(users)) = self.entries.get_mut(&Tag::List) {
      users.retain(|u| u.id != id);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: &str, name: &str) -> User {
    User {
      id: id.into(),
      name: name.into(),
      ..User::default()
    }
  }

  #[test]
  fn set_get_invalidate() {
    let mut cache = TagCache::default();
    cache.set(Tag::List, CachedValue::List(vec![user("1", "A")]));

    assert_eq!(cache.list().unwrap().len(), 1);

    cache.invalidate(&Tag::List);
    assert!(cache.list().is_none());
  }

  #[test]
  fn item_lookup_by_id() {
    let mut cache = TagCache::default();
    cache.set(Tag::Item("7".into()), CachedValue::Item(user("7", "Bob")));

    assert_eq!(cache.item("7").unwrap().name, "Bob");
    assert!(cache.item("8").is_none());
  }

  #[test]
  fn restore_reverts_a_patched_list() {
    let mut cache = TagCache::default();
    cache.set(Tag::List, CachedValue::List(vec![user("7", "Bob")]));

    let patch = cache.snapshot(Tag::List);
    cache.patch_list_entry(
      "7",
      &UserPatch {
        name: Some("Bob2".into()),
        ..UserPatch::default()
      },
    );
    assert_eq!(cache.list().unwrap()[0].name, "Bob2");

    cache.restore(patch);
    assert_eq!(cache.list().unwrap()[0].name, "Bob");
  }

  #[test]
  fn restore_removes_an_entry_that_did_not_exist() {
    let mut cache = TagCache::default();

    let patch = cache.snapshot(Tag::List);
    cache.set(Tag::List, CachedValue::List(vec![user("1", "A")]));

    cache.restore(patch);
    assert!(cache.list().is_none());
  }

  #[test]
  fn list_edits_are_noops_without_a_cached_list() {
    let mut cache = TagCache::default();
    cache.push_list_entry(user("1", "A"));
    cache.remove_list_entry("1");

    assert!(cache.list().is_none());
  }

  #[test]
  fn tags_render_for_logging() {
    assert_eq!(Tag::List.to_string(), "list");
    assert_eq!(Tag::Item("42".into()).to_string(), "item:42");
  }
}
