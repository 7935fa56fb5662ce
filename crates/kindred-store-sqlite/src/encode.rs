//! Encoding and decoding helpers between Rust domain types and the plain
//! column values stored in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` text and decoded through
//! [`kindred_core::date::parse_date`], so a corrupt value fails the read with
//! `MalformedDate` rather than disappearing. Gender is stored as `M`/`F`,
//! spouse status as its integer code.

use chrono::NaiveDate;
use kindred_core::{
  calendar::{AnniversaryRow, BirthdayRow},
  date::{format_date, parse_date},
  geo::{City, Country},
  holiday::Holiday,
  person::{Gender, Person, PersonLite},
  spouse::{SpousePair, SpouseRow, SpouseStatus},
};

use crate::Result;

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "M",
    Gender::Female => "F",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "M" => Ok(Gender::Male),
    "F" => Ok(Gender::Female),
    other => Err(kindred_core::Error::InvalidGender(other.to_owned()).into()),
  }
}

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> { d.map(format_date) }

/// A `LIKE` pattern matching values that start with `prefix` literally.
/// Pair with `ESCAPE '\'`.
pub fn like_prefix(prefix: &str) -> String {
  let mut pattern = String::with_capacity(prefix.len() + 1);
  for c in prefix.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

fn decode_optional_date(
  context: impl FnOnce() -> String,
  s: Option<&str>,
) -> Result<Option<NaiveDate>> {
  Ok(s.map(|s| parse_date(context(), s)).transpose()?)
}

// ─── People ──────────────────────────────────────────────────────────────────

pub const PERSON_LITE_COLUMNS: &str =
  "id, first_name, middle_name, last_name, nick_name, gender, mother_id, father_id";

/// [`PERSON_LITE_COLUMNS`] qualified with a table alias, for joins.
pub fn person_lite_columns(alias: &str) -> String {
  PERSON_LITE_COLUMNS
    .split(", ")
    .map(|col| format!("{alias}.{col}"))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Raw values from a `people` row, projected for display.
pub struct RawPersonLite {
  pub id:          i64,
  pub first_name:  String,
  pub middle_name: String,
  pub last_name:   String,
  pub nick_name:   Option<String>,
  pub gender:      String,
  pub mother_id:   Option<i64>,
  pub father_id:   Option<i64>,
}

impl RawPersonLite {
  /// Read eight columns starting at `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(offset)?,
      first_name:  row.get(offset + 1)?,
      middle_name: row.get(offset + 2)?,
      last_name:   row.get(offset + 3)?,
      nick_name:   row.get(offset + 4)?,
      gender:      row.get(offset + 5)?,
      mother_id:   row.get(offset + 6)?,
      father_id:   row.get(offset + 7)?,
    })
  }

  pub fn into_lite(self) -> Result<PersonLite> {
    Ok(PersonLite {
      id:        self.id,
      name:      kindred_core::name::format_name(
        &self.first_name,
        &self.middle_name,
        &self.last_name,
        self.nick_name.as_deref().unwrap_or_default(),
      ),
      gender:    decode_gender(&self.gender)?,
      mother_id: self.mother_id,
      father_id: self.father_id,
    })
  }
}

pub const PERSON_COLUMNS: &str = "id, first_name, middle_name, last_name, nick_name, gender, \
  is_alive, birth_date, is_birth_year_guess, birth_city_id, home_city_id, mother_id, father_id";

/// Raw values from a full `people` row.
pub struct RawPerson {
  pub id:                  i64,
  pub first_name:          String,
  pub middle_name:         String,
  pub last_name:           String,
  pub nick_name:           Option<String>,
  pub gender:              String,
  pub is_alive:            bool,
  pub birth_date:          Option<String>,
  pub is_birth_year_guess: bool,
  pub birth_city_id:       Option<i64>,
  pub home_city_id:        Option<i64>,
  pub mother_id:           Option<i64>,
  pub father_id:           Option<i64>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      first_name:          row.get(1)?,
      middle_name:         row.get(2)?,
      last_name:           row.get(3)?,
      nick_name:           row.get(4)?,
      gender:              row.get(5)?,
      is_alive:            row.get(6)?,
      birth_date:          row.get(7)?,
      is_birth_year_guess: row.get(8)?,
      birth_city_id:       row.get(9)?,
      home_city_id:        row.get(10)?,
      mother_id:           row.get(11)?,
      father_id:           row.get(12)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    let id = self.id;
    Ok(Person {
      id,
      gender: decode_gender(&self.gender)?,
      birth_date: decode_optional_date(
        || format!("birth_date of person {id}"),
        self.birth_date.as_deref(),
      )?,
      first_name: self.first_name,
      middle_name: self.middle_name,
      last_name: self.last_name,
      nick_name: self.nick_name,
      is_alive: self.is_alive,
      is_birth_year_guess: self.is_birth_year_guess,
      birth_city_id: self.birth_city_id,
      home_city_id: self.home_city_id,
      mother_id: self.mother_id,
      father_id: self.father_id,
    })
  }
}

// ─── Calendar feeds ──────────────────────────────────────────────────────────

pub struct RawBirthday {
  pub person:     RawPersonLite,
  pub birth_date: String,
}

impl RawBirthday {
  pub fn into_row(self) -> Result<BirthdayRow> {
    let birth_date =
      parse_date(format!("birth_date of person {}", self.person.id), &self.birth_date)?;
    Ok(BirthdayRow { person: self.person.into_lite()?, birth_date })
  }
}

pub struct RawAnniversary {
  pub first:        RawPersonLite,
  pub second:       RawPersonLite,
  pub married_date: String,
}

impl RawAnniversary {
  pub fn into_row(self) -> Result<AnniversaryRow> {
    let married_date = parse_date(
      format!("married_date of spouses {} and {}", self.first.id, self.second.id),
      &self.married_date,
    )?;
    Ok(AnniversaryRow {
      first: self.first.into_lite()?,
      second: self.second.into_lite()?,
      married_date,
    })
  }
}

// ─── Spouses ─────────────────────────────────────────────────────────────────

pub struct RawSpouse {
  pub person1_id:   i64,
  pub person2_id:   i64,
  pub status:       i64,
  pub married_date: Option<String>,
}

impl RawSpouse {
  pub fn into_row(self) -> Result<SpouseRow> {
    let (a, b) = (self.person1_id, self.person2_id);
    Ok(SpouseRow {
      pair:         SpousePair::new(a, b)?,
      status:       SpouseStatus::from_code(self.status)?,
      married_date: decode_optional_date(
        || format!("married_date of spouses {a} and {b}"),
        self.married_date.as_deref(),
      )?,
    })
  }
}

// ─── Holidays ────────────────────────────────────────────────────────────────

pub struct RawHoliday {
  pub id:   i64,
  pub date: String,
  pub name: String,
}

impl RawHoliday {
  pub fn into_holiday(self) -> Result<Holiday> {
    Ok(Holiday {
      date: parse_date(format!("date of holiday {}", self.id), &self.date)?,
      id:   self.id,
      name: self.name,
    })
  }
}

// ─── Geography ───────────────────────────────────────────────────────────────

pub const CITY_COLUMNS: &str =
  "city_id, city_name, region_id, region_code, country_code, lat, lng";

pub fn city_from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<City> {
  Ok(City {
    id:           row.get(offset)?,
    name:         row.get(offset + 1)?,
    region_id:    row.get(offset + 2)?,
    region_code:  row.get(offset + 3)?,
    country_code: row.get(offset + 4)?,
    latitude:     row.get(offset + 5)?,
    longitude:    row.get(offset + 6)?,
  })
}

pub const COUNTRY_SELECT: &str = "
  SELECT co.code, co.name, co.continent_code, co.gdp, co.population, co.has_region_icons,
         ci.city_id, ci.city_name, ci.region_id, ci.region_code, ci.country_code, ci.lat, ci.lng
  FROM countries co
  LEFT JOIN city_view ci ON ci.city_id = co.capital_city_id";

pub fn country_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Country> {
  let capital_id: Option<i64> = row.get(6)?;
  let capital = match capital_id {
    Some(_) => Some(city_from_row(row, 6)?),
    None => None,
  };
  Ok(Country {
    code: row.get(0)?,
    name: row.get(1)?,
    continent_code: row.get(2)?,
    gdp: row.get(3)?,
    population: row.get(4)?,
    has_region_icons: row.get(5)?,
    capital,
  })
}
