//! Cached data access over the remote directory and the override store.
//!
//! This is the single data interface the command surface talks to. Reads
//! go remote-first and merge in local overrides. Mutations never reach
//! the remote service: they persist into the override store and patch
//! the cached query results optimistically, rolling the patch back if
//! the write fails.

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{CachedValue, Tag, TagCache};
use crate::error::{Error, Result};
use crate::store::{OverrideRecord, OverrideStore};

use super::client::RemoteDirectory;
use super::merge::merge;
use super::types::{User, UserPatch};

/// Directory client with local overrides and tag-invalidated caching.
///
/// The cache mutex is held only across synchronous sections, never
/// across an await; two mutations interleaved across suspension points
/// can still race on the store's read-modify-write, which is accepted
/// for a single-user command-line process.
pub struct DirectoryService<R, S> {
  remote: R,
  store: S,
  cache: Mutex<TagCache>,
}

impl<R: RemoteDirectory, S: OverrideStore> DirectoryService<R, S> {
  pub fn new(remote: R, store: S) -> Self {
    Self {
      remote,
      store,
      cache: Mutex::new(TagCache::default()),
    }
  }

  /// The remote list merged with local overrides.
  ///
  /// Served from cache while the `list` tag is valid. A remote failure
  /// surfaces as [`Error::Network`]; there is no retry and no stale
  /// fallback.
  pub async fn list_users(&self) -> Result<Vec<User>> {
    let cached = self.cache.lock().list().map(<[User]>::to_vec);
    if let Some(users) = cached {
      debug!("serving user list from cache");
      return Ok(users);
    }

    let remote = self.remote.fetch_users().await?;
    let set = self.store.load();

    // Tombstoned ids are dropped before merging; overrides for them were
    // already removed when the tombstone was written.
    let visible: Vec<User> = remote
      .into_iter()
      .filter(|u| !set.is_deleted(&u.id))
      .collect();
    let merged = merge(&visible, &set.records);
    debug!(count = merged.len(), "merged remote list with overrides");

    let mut cache = self.cache.lock();
    for user in &merged {
      cache.set(Tag::Item(user.id.clone()), CachedValue::Item(user.clone()));
    }
    cache.set(Tag::List, CachedValue::List(merged.clone()));

    Ok(merged)
  }

  /// A single record: tombstones win, then the cache, then the override
  /// store, then the remote service.
  ///
  /// An override hit never goes to the network; the returned record may
  /// be partial (empty non-edited fields) until the next merged list
  /// read fills it from the remote snapshot.
  pub async fn get_user(&self, id: &str) -> Result<User> {
    let set = self.store.load();
    if set.is_deleted(id) {
      return Err(Error::NotFound(id.to_string()));
    }

    let cached = self.cache.lock().item(id).cloned();
    if let Some(user) = cached {
      debug!(%id, "serving user from cache");
      return Ok(user);
    }

    if let Some(record) = set.find(id) {
      let user = record.materialize();
      self
        .cache
        .lock()
        .set(Tag::Item(id.to_string()), CachedValue::Item(user.clone()));
      return Ok(user);
    }

    let user = self.remote.fetch_user(id).await?;
    self
      .cache
      .lock()
      .set(Tag::Item(id.to_string()), CachedValue::Item(user.clone()));
    Ok(user)
  }

  /// Create a record locally and return it.
  ///
  /// One generated id serves both the optimistic cache entry and the
  /// persisted record, so the entry the caller saw is the one the next
  /// refetch confirms.
  pub async fn add_user(&self, fields: UserPatch) -> Result<User> {
    let id = Uuid::new_v4().to_string();
    let user = OverrideRecord {
      id: id.clone(),
      fields: fields.clone(),
    }
    .materialize();

    let patch = {
      let mut cache = self.cache.lock();
      let patch = cache.snapshot(Tag::List);
      cache.push_list_entry(user.clone());
      patch
    };

    match self.store.upsert(&id, fields) {
      Ok(()) => {
        info!(%id, "created user");
        self.cache.lock().invalidate(&Tag::List);
        Ok(user)
      }
      Err(e) => {
        warn!(%id, error = %e, "create failed, rolling back optimistic entry");
        self.cache.lock().restore(patch);
        Err(e.into())
      }
    }
  }

  /// Merge `fields` into the local override for `id`, creating one if
  /// none exists, including for ids that only exist remotely.
  pub async fn update_user(&self, id: &str, fields: UserPatch) -> Result<()> {
    let patch = {
      let mut cache = self.cache.lock();
      let patch = cache.snapshot(Tag::List);
      cache.patch_list_entry(id, &fields);
      patch
    };

    match self.store.upsert(id, fields) {
      Ok(()) => {
        info!(%id, "updated user");
        // The optimistic list patch stays authoritative; only the item
        // entry must be recomputed.
        self.cache.lock().invalidate(&Tag::Item(id.to_string()));
        Ok(())
      }
      Err(e) => {
        warn!(%id, error = %e, "update failed, rolling back optimistic patch");
        self.cache.lock().restore(patch);
        Err(e.into())
      }
    }
  }

  /// Delete `id`: drop its override and persist a tombstone, so a
  /// remote-originated record stays deleted across restarts.
  pub async fn delete_user(&self, id: &str) -> Result<()> {
    let patch = {
      let mut cache = self.cache.lock();
      let patch = cache.snapshot(Tag::List);
      cache.remove_list_entry(id);
      patch
    };

    match self.store.remove(id) {
      Ok(()) => {
        info!(%id, "deleted user");
        self.cache.lock().invalidate(&Tag::Item(id.to_string()));
        Ok(())
      }
      Err(e) => {
        warn!(%id, error = %e, "delete failed, rolling back optimistic removal");
        self.cache.lock().restore(patch);
        Err(e.into())
      }
    }
  }
}
