//! Calendar arithmetic: boundary date parsing, month/day recurrences, and the
//! recurring-date window matcher.
//!
//! Birthdays and anniversaries recur every year on the same month and day, so
//! all window tests compare `(month, day)` pairs and ignore the year. A window
//! whose end falls lexicographically before its start crosses December 31.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Format used for every date crossing the record store boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` string, failing loudly on anything else.
///
/// `context` names where the value came from (e.g. `"birth_date of person 7"`)
/// and is carried in the error.
pub fn parse_date(context: impl Into<String>, value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| Error::MalformedDate {
    context: context.into(),
    value:   value.to_owned(),
  })
}

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// The Monday on or after `date`.
pub fn next_monday(date: NaiveDate) -> NaiveDate {
  let offset = (7 - date.weekday().num_days_from_monday()) % 7;
  date + Days::new(u64::from(offset))
}

// ─── MonthDay ────────────────────────────────────────────────────────────────

/// The yearly-recurring part of a date.
///
/// Ordering is lexicographic on `(month, day)`. February 29 is a valid key
/// regardless of any particular year.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthDay {
  month: u32,
  day:   u32,
}

impl MonthDay {
  pub fn new(month: u32, day: u32) -> Result<Self> {
    let max_day = match month {
      1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
      4 | 6 | 9 | 11 => 30,
      2 => 29,
      _ => 0,
    };
    if day == 0 || day > max_day {
      return Err(Error::InvalidRecurrence { month, day });
    }
    Ok(Self { month, day })
  }

  pub fn of(date: NaiveDate) -> Self {
    Self { month: date.month(), day: date.day() }
  }

  pub fn month(&self) -> u32 { self.month }

  pub fn day(&self) -> u32 { self.day }
}

impl From<NaiveDate> for MonthDay {
  fn from(date: NaiveDate) -> Self { Self::of(date) }
}

impl fmt::Display for MonthDay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}-{:02}", self.month, self.day)
  }
}

/// Whether `recurrence` falls inside `[start, end)` compared on month/day
/// only. When `start > end` the window wraps across the new year.
pub fn matches(recurrence: MonthDay, start: MonthDay, end: MonthDay) -> bool {
  if start <= end {
    start <= recurrence && recurrence < end
  } else {
    recurrence >= start || recurrence < end
  }
}

// ─── RecurrenceWindow ────────────────────────────────────────────────────────

/// A half-open date range `[start, end)` used to select yearly recurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurrenceWindow {
  start: NaiveDate,
  end:   NaiveDate,
}

impl RecurrenceWindow {
  /// Build a window; `end` must be strictly after `start` and less than a
  /// year past it, so the range crosses the new year at most once.
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    let within_a_year = start
      .checked_add_months(Months::new(12))
      .is_some_and(|limit| end < limit);
    if end <= start || !within_a_year {
      return Err(Error::InvalidWindow { start, end });
    }
    Ok(Self { start, end })
  }

  /// A window of `days` days beginning at `start`.
  pub fn starting_at(start: NaiveDate, days: u64) -> Result<Self> {
    let end = start
      .checked_add_days(Days::new(days))
      .ok_or(Error::InvalidWindow { start, end: start })?;
    Self::new(start, end)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn end(&self) -> NaiveDate { self.end }

  /// Whether the window crosses December 31 → January 1.
  pub fn wraps(&self) -> bool { MonthDay::of(self.start) > MonthDay::of(self.end) }

  pub fn contains(&self, recurrence: MonthDay) -> bool {
    matches(recurrence, MonthDay::of(self.start), MonthDay::of(self.end))
  }

  /// Chronological position of `recurrence` inside the window.
  ///
  /// In a wrapping window, recurrences after the new year sort after those
  /// in December.
  pub fn sort_key(&self, recurrence: MonthDay) -> (bool, MonthDay) {
    let after_new_year = self.wraps() && recurrence < MonthDay::of(self.start);
    (after_new_year, recurrence)
  }

  /// The concrete date `recurrence` lands on inside the window, or `None`
  /// for February 29 in a common year.
  pub fn occurrence(&self, recurrence: MonthDay) -> Option<NaiveDate> {
    let (after_new_year, _) = self.sort_key(recurrence);
    let year = if after_new_year { self.end.year() } else { self.start.year() };
    NaiveDate::from_ymd_opt(year, recurrence.month, recurrence.day)
  }
}
