//! People and their read projections.
//!
//! A [`Person`] is the full stored row. Relationship views never nest full
//! records; they use [`PersonLite`], which carries only what a list or a
//! family tree needs to render (including the raw parent ids, so one extra
//! hop can be taken without reloading the row).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, age::age_in_years, geo::City, name::format_name, spouse::SpouseLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Male => "Male",
      Self::Female => "Female",
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A stored person row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id:                  i64,
  pub first_name:          String,
  pub middle_name:         String,
  pub last_name:           String,
  pub nick_name:           Option<String>,
  pub gender:              Gender,
  pub is_alive:            bool,
  pub birth_date:          Option<NaiveDate>,
  /// The year part of `birth_date` is an estimate; month and day are known.
  pub is_birth_year_guess: bool,
  pub birth_city_id:       Option<i64>,
  pub home_city_id:        Option<i64>,
  pub mother_id:           Option<i64>,
  pub father_id:           Option<i64>,
}

impl Person {
  pub fn full_name(&self) -> String {
    format_name(
      &self.first_name,
      &self.middle_name,
      &self.last_name,
      self.nick_name.as_deref().unwrap_or_default(),
    )
  }

  pub fn lite(&self) -> PersonLite {
    PersonLite {
      id:        self.id,
      name:      self.full_name(),
      gender:    self.gender,
      mother_id: self.mother_id,
      father_id: self.father_id,
    }
  }

  /// Age on `as_of`, or `None` when the birth date is unknown.
  pub fn age(&self, as_of: NaiveDate) -> Result<Option<u32>> {
    self.birth_date.map(|birth| age_in_years(birth, as_of)).transpose()
  }
}

/// Minimal person projection used wherever relationships are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonLite {
  pub id:        i64,
  pub name:      String,
  pub gender:    Gender,
  pub mother_id: Option<i64>,
  pub father_id: Option<i64>,
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Input for inserting or replacing a person row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub first_name:          String,
  #[serde(default)]
  pub middle_name:         String,
  #[serde(default)]
  pub last_name:           String,
  pub nick_name:           Option<String>,
  pub gender:              Gender,
  #[serde(default = "default_alive")]
  pub is_alive:            bool,
  pub birth_date:          Option<NaiveDate>,
  #[serde(default)]
  pub is_birth_year_guess: bool,
  pub birth_city_id:       Option<i64>,
  pub home_city_id:        Option<i64>,
  pub mother_id:           Option<i64>,
  pub father_id:           Option<i64>,
}

fn default_alive() -> bool { true }

impl NewPerson {
  pub fn new(first_name: impl Into<String>, gender: Gender) -> Self {
    Self {
      first_name: first_name.into(),
      middle_name: String::new(),
      last_name: String::new(),
      nick_name: None,
      gender,
      is_alive: true,
      birth_date: None,
      is_birth_year_guess: false,
      birth_city_id: None,
      home_city_id: None,
      mother_id: None,
      father_id: None,
    }
  }

  /// Trim name parts, collapse an empty nickname to `None`, and require a
  /// first name.
  pub fn normalized(mut self) -> Result<Self> {
    for part in [&mut self.first_name, &mut self.middle_name, &mut self.last_name] {
      *part = part.trim().to_owned();
    }
    self.nick_name = self
      .nick_name
      .map(|n| n.trim().to_owned())
      .filter(|n| !n.is_empty());

    if self.first_name.is_empty() {
      return Err(Error::InvalidInput("first name can not be empty".into()));
    }
    Ok(self)
  }
}

// ─── Resolved views ──────────────────────────────────────────────────────────

/// A person with their one-hop relationship neighbourhood resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDetail {
  pub person:     Person,
  pub name:       String,
  pub mother:     Option<PersonLite>,
  pub father:     Option<PersonLite>,
  pub birth_city: Option<City>,
  pub home_city:  Option<City>,
  /// Ordered by birth date ascending.
  pub children:   Vec<PersonLite>,
  /// Full siblings only (same mother and father), ordered by birth date.
  pub siblings:   Vec<PersonLite>,
  /// Ordered Married, Dating, Ex-Married.
  pub spouses:    Vec<SpouseLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandparentPair {
  pub grandfather: Option<PersonLite>,
  pub grandmother: Option<PersonLite>,
}

/// Best-effort second hop past the father and mother.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grandparents {
  pub paternal: GrandparentPair,
  pub maternal: GrandparentPair,
}
