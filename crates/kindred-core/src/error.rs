//! Error types for `kindred-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A requested row (person, city, region, country, tag…) does not exist.
  #[error("{entity} not found: {key}")]
  NotFound { entity: &'static str, key: String },

  /// A stored foreign reference points at a row that does not exist.
  #[error("person {person_id} has a broken {relation} reference to {missing_id}")]
  ReferentialBreak {
    person_id:  i64,
    relation:   &'static str,
    missing_id: i64,
  },

  #[error("malformed date in {context}: {value:?}")]
  MalformedDate { context: String, value: String },

  #[error("invalid date window: {start} .. {end}")]
  InvalidWindow { start: NaiveDate, end: NaiveDate },

  #[error("birth date {birth} is after {as_of}")]
  FutureBirthDate { birth: NaiveDate, as_of: NaiveDate },

  #[error("invalid recurrence: month {month}, day {day}")]
  InvalidRecurrence { month: u32, day: u32 },

  #[error("unknown spouse status: {0}")]
  InvalidSpouseStatus(i64),

  #[error("unknown gender code: {0:?}")]
  InvalidGender(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("a person cannot be their own spouse ({0})")]
  SelfSpouse(i64),

  /// The underlying record store failed; propagated verbatim.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
    Self::NotFound { entity, key: key.to_string() }
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
