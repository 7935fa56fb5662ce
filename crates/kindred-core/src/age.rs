//! Whole-years age calculation.

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result, date::MonthDay};

/// Age in completed years on `as_of`.
///
/// The count drops by one until the birthday's month/day has been reached in
/// `as_of`'s year. A birth date after `as_of` is rejected.
pub fn age_in_years(birth: NaiveDate, as_of: NaiveDate) -> Result<u32> {
  if birth > as_of {
    return Err(Error::FutureBirthDate { birth, as_of });
  }

  let mut years = as_of.year() - birth.year();
  if MonthDay::of(as_of) < MonthDay::of(birth) {
    years -= 1;
  }
  Ok(years as u32)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn day_before_birthday() {
    assert_eq!(age_in_years(date(1990, 3, 15), date(2024, 3, 14)).unwrap(), 33);
  }

  #[test]
  fn on_birthday() {
    assert_eq!(age_in_years(date(1990, 3, 15), date(2024, 3, 15)).unwrap(), 34);
  }

  #[test]
  fn earlier_month_same_day() {
    assert_eq!(age_in_years(date(1990, 3, 15), date(2024, 2, 20)).unwrap(), 33);
    assert_eq!(age_in_years(date(1990, 3, 15), date(2024, 12, 1)).unwrap(), 34);
  }

  #[test]
  fn born_today() {
    assert_eq!(age_in_years(date(2024, 6, 1), date(2024, 6, 1)).unwrap(), 0);
  }

  #[test]
  fn leap_day_birthday_counts_from_march_in_common_years() {
    assert_eq!(age_in_years(date(2000, 2, 29), date(2023, 2, 28)).unwrap(), 22);
    assert_eq!(age_in_years(date(2000, 2, 29), date(2023, 3, 1)).unwrap(), 23);
  }

  #[test]
  fn future_birth_is_an_error() {
    let err = age_in_years(date(2030, 1, 1), date(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, Error::FutureBirthDate { .. }));
  }
}
