//! The `FamilyStore` trait: everything the core reads from (and passes writes
//! through to) the relational record store.
//!
//! The trait is implemented by storage backends (e.g. `kindred-store-sqlite`).
//! The resolver, calendar builder, and API layer depend on this abstraction,
//! never on a concrete backend. Every operation receives the store explicitly;
//! there is no process-wide handle.
//!
//! Backends decode their rows explicitly: a date column that does not parse
//! as `YYYY-MM-DD` surfaces as [`Error::MalformedDate`](crate::Error), never
//! as a silently-missing value.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  calendar::{AnniversaryRow, BirthdayRow},
  geo::{City, Continent, Country, NewCountry, NewRegion, Region},
  holiday::Holiday,
  person::{NewPerson, Person, PersonLite},
  spouse::{NewSpouse, SpousePair, SpouseRow},
  tag::Tag,
};

/// Abstraction over a Kindred record store backend.
///
/// Point lookups return `Ok(None)` for a missing row; deciding whether that
/// is `NotFound` or a `ReferentialBreak` is the caller's business. Deletes of
/// a missing row fail with [`Error::NotFound`](crate::Error).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── People ────────────────────────────────────────────────────────────

  fn get_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn get_person_lite(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PersonLite>, Self::Error>> + Send + '_;

  /// Every person, ordered by last, first, then middle name.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<PersonLite>, Self::Error>> + Send + '_;

  /// People whose first, last, or nick name starts with `prefix`.
  fn search_people<'a>(
    &'a self,
    prefix: &'a str,
    offset: usize,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<PersonLite>, Self::Error>> + Send + 'a;

  /// People whose mother or father is `parent_id`, by birth date ascending.
  /// Unknown birth dates sort first.
  fn list_children_of(
    &self,
    parent_id: i64,
  ) -> impl Future<Output = Result<Vec<PersonLite>, Self::Error>> + Send + '_;

  /// People with exactly this father and mother, other than `exclude_id`,
  /// by birth date ascending.
  fn list_siblings_of(
    &self,
    father_id: i64,
    mother_id: i64,
    exclude_id: i64,
  ) -> impl Future<Output = Result<Vec<PersonLite>, Self::Error>> + Send + '_;

  /// Insert a person and return the new id.
  fn insert_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn update_person(
    &self,
    id: i64,
    input: NewPerson,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Spouses ───────────────────────────────────────────────────────────

  /// Relations on either side of the pair, ordered by status.
  fn list_spouses_of(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<SpouseRow>, Self::Error>> + Send + '_;

  fn insert_spouse(
    &self,
    input: NewSpouse,
  ) -> impl Future<Output = Result<SpouseRow, Self::Error>> + Send + '_;

  fn delete_spouse(
    &self,
    pair: SpousePair,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Calendar feeds ────────────────────────────────────────────────────

  /// Living people with a known birth date, by month then day.
  fn list_living_birthdays(
    &self,
  ) -> impl Future<Output = Result<Vec<BirthdayRow>, Self::Error>> + Send + '_;

  /// Married couples with a known marriage date, by month then day.
  fn list_married_anniversaries(
    &self,
  ) -> impl Future<Output = Result<Vec<AnniversaryRow>, Self::Error>> + Send + '_;

  /// Holidays dated on or after January 1 of `year`, by date.
  fn list_holidays_from(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Vec<Holiday>, Self::Error>> + Send + '_;

  fn insert_holiday<'a>(
    &'a self,
    date: NaiveDate,
    name: &'a str,
  ) -> impl Future<Output = Result<Holiday, Self::Error>> + Send + 'a;

  // ── Geography ─────────────────────────────────────────────────────────

  fn get_city(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<City>, Self::Error>> + Send + '_;

  fn search_cities<'a>(
    &'a self,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + 'a;

  fn insert_city<'a>(
    &'a self,
    name: &'a str,
    region_id: i64,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + 'a;

  fn delete_city(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_region(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Region>, Self::Error>> + Send + '_;

  fn list_regions(
    &self,
    country_code: Option<String>,
  ) -> impl Future<Output = Result<Vec<Region>, Self::Error>> + Send + '_;

  fn insert_region(
    &self,
    input: NewRegion,
  ) -> impl Future<Output = Result<Region, Self::Error>> + Send + '_;

  fn get_country<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  /// All countries by name.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  fn insert_country(
    &self,
    input: NewCountry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_country<'a>(
    &'a self,
    original_code: &'a str,
    input: NewCountry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn delete_country<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn list_continents(
    &self,
  ) -> impl Future<Output = Result<Vec<Continent>, Self::Error>> + Send + '_;

  // ── Tags ──────────────────────────────────────────────────────────────

  fn insert_tag<'a>(
    &'a self,
    label: &'a str,
  ) -> impl Future<Output = Result<Tag, Self::Error>> + Send + 'a;

  fn get_tag(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send + '_;

  fn get_tag_by_label<'a>(
    &'a self,
    label: &'a str,
  ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send + 'a;

  /// Tags whose label starts with `prefix`, by label.
  fn search_tags<'a>(
    &'a self,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + 'a;

  fn tags_for_person(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;

  /// Attach a tag; attaching twice is a no-op.
  fn tag_person(
    &self,
    tag_id: i64,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn untag_person(
    &self,
    tag_id: i64,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a tag together with all of its memberships.
  fn delete_tag(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Lift a backend error into the core taxonomy.
pub fn store_error<E: Into<crate::Error>>(e: E) -> crate::Error { e.into() }
