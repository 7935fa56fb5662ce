//! Spouse and dating relations.
//!
//! A relation is an unordered pair of people. It is stored with the smaller
//! id first so that each pair has exactly one row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, person::PersonLite};

/// Relation status; the discriminant is the stored code and the sort order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpouseStatus {
  Married   = 1,
  Dating    = 2,
  ExMarried = 3,
}

impl SpouseStatus {
  pub fn code(self) -> i64 { self as i64 }

  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      1 => Ok(Self::Married),
      2 => Ok(Self::Dating),
      3 => Ok(Self::ExMarried),
      other => Err(Error::InvalidSpouseStatus(other)),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Married => "Married",
      Self::Dating => "Dating",
      Self::ExMarried => "Ex-Married",
    }
  }
}

/// Two distinct person ids, smaller first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpousePair {
  low:  i64,
  high: i64,
}

impl SpousePair {
  pub fn new(a: i64, b: i64) -> Result<Self> {
    if a == b {
      return Err(Error::SelfSpouse(a));
    }
    Ok(Self { low: a.min(b), high: a.max(b) })
  }

  pub fn low(&self) -> i64 { self.low }

  pub fn high(&self) -> i64 { self.high }

  /// The member of the pair that is not `id`, or `None` if `id` is not in it.
  pub fn other(&self, id: i64) -> Option<i64> {
    if id == self.low {
      Some(self.high)
    } else if id == self.high {
      Some(self.low)
    } else {
      None
    }
  }
}

/// A stored spouse row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpouseRow {
  pub pair:         SpousePair,
  pub status:       SpouseStatus,
  pub married_date: Option<NaiveDate>,
}

/// Input for recording a relation between two people, in either order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpouse {
  pub person_a:     i64,
  pub person_b:     i64,
  pub status:       SpouseStatus,
  pub married_date: Option<NaiveDate>,
}

impl NewSpouse {
  pub fn pair(&self) -> Result<SpousePair> { SpousePair::new(self.person_a, self.person_b) }
}

/// The other side of a relation, as seen from one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseLink {
  pub spouse:       PersonLite,
  pub status:       SpouseStatus,
  pub married_date: Option<NaiveDate>,
}
