//! Error type for reminder delivery.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Building the digest failed; nothing was sent.
  #[error(transparent)]
  Core(#[from] kindred_core::Error),

  /// Every recipient's delivery failed.
  #[error("no reminder could be delivered ({failed} failed)")]
  Undelivered { failed: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
