//! Birthday, anniversary, and holiday calendars.
//!
//! Two views are built fresh on every request:
//!
//! - [`build_year_calendar`]: every birthday and anniversary bucketed into
//!   the twelve months, independent of today's date.
//! - [`build_window_calendar`]: the events whose month/day falls inside a
//!   [`RecurrenceWindow`], in chronological order across the window. This is
//!   what reminder digests are made of.
//!
//! Any store failure, including a stored date that fails to parse, aborts the
//! whole build.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  Result,
  date::{MonthDay, RecurrenceWindow},
  person::PersonLite,
  store::{FamilyStore, store_error},
};

const MONTH_NAMES: [&str; 12] = [
  "January", "February", "March", "April", "May", "June", "July", "August", "September",
  "October", "November", "December",
];

// ─── Store feed rows ─────────────────────────────────────────────────────────

/// A living person with a known birth date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRow {
  pub person:     PersonLite,
  pub birth_date: NaiveDate,
}

/// A married couple with a known marriage date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnniversaryRow {
  pub first:        PersonLite,
  pub second:       PersonLite,
  pub married_date: NaiveDate,
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Birthday,
  Anniversary,
  Holiday,
}

/// A derived calendar entry. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
  /// The recorded date: birth date, marriage date, or holiday date.
  pub date:       NaiveDate,
  /// The yearly position of the event.
  pub on:         MonthDay,
  pub kind:       EventKind,
  pub caption:    String,
  /// People the event is about, for linking. Empty for holidays.
  pub person_ids: Vec<i64>,
}

impl CalendarEvent {
  fn birthday(row: BirthdayRow) -> Self {
    Self {
      date:       row.birth_date,
      on:         MonthDay::of(row.birth_date),
      kind:       EventKind::Birthday,
      caption:    row.person.name,
      person_ids: vec![row.person.id],
    }
  }

  fn anniversary(row: AnniversaryRow) -> Self {
    Self {
      date:       row.married_date,
      on:         MonthDay::of(row.married_date),
      kind:       EventKind::Anniversary,
      caption:    format!("{} & {}", row.first.name, row.second.name),
      person_ids: vec![row.first.id, row.second.id],
    }
  }
}

// ─── Year calendar ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
  /// 1-based month number.
  pub month:  u32,
  pub name:   String,
  pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCalendar {
  pub months: Vec<CalendarMonth>,
}

/// Bucket every living person's birthday and every married couple's
/// anniversary by month, each month ordered by day.
///
/// Events on the same day keep scan order: birthdays before anniversaries.
#[tracing::instrument(skip(store))]
pub async fn build_year_calendar<S: FamilyStore>(store: &S) -> Result<YearCalendar> {
  let birthdays = store.list_living_birthdays().await.map_err(store_error)?;
  info!(count = birthdays.len(), "birthdays found");
  let anniversaries = store.list_married_anniversaries().await.map_err(store_error)?;
  info!(count = anniversaries.len(), "anniversaries found");

  let events = birthdays
    .into_iter()
    .map(CalendarEvent::birthday)
    .chain(anniversaries.into_iter().map(CalendarEvent::anniversary));

  Ok(bucket_by_month(events))
}

fn bucket_by_month(events: impl IntoIterator<Item = CalendarEvent>) -> YearCalendar {
  let mut months: Vec<CalendarMonth> = MONTH_NAMES
    .iter()
    .zip(1..)
    .map(|(name, month)| CalendarMonth { month, name: (*name).to_owned(), events: Vec::new() })
    .collect();

  for event in events {
    let index = (event.on.month() - 1) as usize;
    months[index].events.push(event);
  }
  for month in &mut months {
    month.events.sort_by_key(|event| event.on.day());
  }

  YearCalendar { months }
}

// ─── Window calendar ─────────────────────────────────────────────────────────

/// Collect the birthdays, anniversaries, and optionally holidays that fall in
/// `window`, in chronological order across it.
#[tracing::instrument(skip(store))]
pub async fn build_window_calendar<S: FamilyStore>(
  store: &S,
  window: RecurrenceWindow,
  include_holidays: bool,
) -> Result<Vec<CalendarEvent>> {
  let birthdays = store.list_living_birthdays().await.map_err(store_error)?;
  let anniversaries = store.list_married_anniversaries().await.map_err(store_error)?;

  let mut events: Vec<CalendarEvent> = birthdays
    .into_iter()
    .map(CalendarEvent::birthday)
    .chain(anniversaries.into_iter().map(CalendarEvent::anniversary))
    .filter(|event| window.contains(event.on))
    .collect();

  if include_holidays {
    let holidays = store
      .list_holidays_from(window.start().year())
      .await
      .map_err(store_error)?;

    // Holiday rows are dated occurrences: only this window's own rows qualify.
    events.extend(
      holidays
        .into_iter()
        .filter(|holiday| window.start() <= holiday.date && holiday.date < window.end())
        .filter(|holiday| window.contains(MonthDay::of(holiday.date)))
        .map(|holiday| CalendarEvent {
          date:       holiday.date,
          on:         MonthDay::of(holiday.date),
          kind:       EventKind::Holiday,
          caption:    holiday.name,
          person_ids: Vec::new(),
        }),
    );
  }

  events.sort_by_key(|event| window.sort_key(event.on));
  info!(count = events.len(), "events found in window");
  Ok(events)
}
