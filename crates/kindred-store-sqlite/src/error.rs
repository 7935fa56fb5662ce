//! Error type for `kindred-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A decoding or lookup failure expressed in the core taxonomy.
  #[error(transparent)]
  Core(#[from] kindred_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Self::Database(e.into()) }
}

impl From<Error> for kindred_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      Error::Database(db) => kindred_core::Error::Store(Box::new(db)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
