//! Error taxonomy for directory operations.

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the data access layer.
///
/// Every failure is surfaced once to the caller; nothing in this crate
/// retries.
#[derive(Debug, Error)]
pub enum Error {
  /// The remote fetch failed in transport or returned a non-success,
  /// non-404 status.
  #[error("remote directory request failed: {0}")]
  Network(#[from] reqwest::Error),

  /// A by-id lookup matched nothing, locally or remotely.
  #[error("no user with id {0}")]
  NotFound(String),

  /// The override store could not be written. The failed mutation has
  /// already been rolled back from the cache.
  #[error("override storage failed: {0}")]
  Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;
