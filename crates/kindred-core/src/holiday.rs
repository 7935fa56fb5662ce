//! Fixed-date holidays.
//!
//! Unlike birthdays, each year's occurrence of a holiday is its own row with a
//! full date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
  pub id:   i64,
  pub date: NaiveDate,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearHolidays {
  pub year:     i32,
  pub holidays: Vec<Holiday>,
}

/// Group date-ordered holidays into consecutive per-year buckets.
pub fn group_by_year(holidays: Vec<Holiday>) -> Vec<YearHolidays> {
  let mut years: Vec<YearHolidays> = Vec::new();
  for holiday in holidays {
    let year = holiday.date.year();
    match years.last_mut() {
      Some(bucket) if bucket.year == year => bucket.holidays.push(holiday),
      _ => years.push(YearHolidays { year, holidays: vec![holiday] }),
    }
  }
  years
}
