//! Handlers for the derived calendars and the holiday list.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/calendar` | Birthdays and anniversaries bucketed by month |
//! | `GET`  | `/reminders` | `?start_date=YYYY-MM-DD&weeks=4&holidays=true` |
//! | `GET`  | `/holidays` | `?from_year=2024`, grouped by year |
//! | `POST` | `/holidays` | Body: `{"date":"2025-01-01","name":"New Year's Day"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Datelike, Local, NaiveDate};
use kindred_core::{
  calendar::{YearCalendar, build_year_calendar},
  date::{RecurrenceWindow, parse_date},
  holiday::{YearHolidays, group_by_year},
  reminder::{DEFAULT_WEEKS, ReminderDigest, default_window},
  store::FamilyStore,
};
use serde::Deserialize;

use crate::error::{ApiError, store_error};

/// `GET /calendar`
pub async fn year<S: FamilyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<YearCalendar>, ApiError> {
  Ok(Json(build_year_calendar(&*store).await?))
}

// ─── Reminders ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReminderParams {
  /// First day of the window. Defaults to the Monday on or after today.
  pub start_date: Option<String>,
  pub weeks:      Option<u64>,
  pub holidays:   Option<bool>,
}

/// `GET /reminders[?start_date=...][&weeks=...][&holidays=...]`
pub async fn reminders<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ReminderParams>,
) -> Result<Json<ReminderDigest>, ApiError> {
  let weeks = params.weeks.unwrap_or(DEFAULT_WEEKS);
  let window = match params.start_date.as_deref() {
    Some(raw) => {
      let start =
        parse_date("start_date", raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;
      RecurrenceWindow::starting_at(start, weeks.saturating_mul(7))?
    }
    None => default_window(Local::now().date_naive(), weeks)?,
  };

  let digest = ReminderDigest::build(&*store, window, params.holidays.unwrap_or(true)).await?;
  Ok(Json(digest))
}

// ─── Holidays ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HolidayParams {
  pub from_year: Option<i32>,
}

/// `GET /holidays[?from_year=...]`
pub async fn holidays<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<HolidayParams>,
) -> Result<Json<Vec<YearHolidays>>, ApiError> {
  let from_year = params.from_year.unwrap_or_else(|| Local::now().year());
  let holidays = store.list_holidays_from(from_year).await.map_err(store_error)?;
  Ok(Json(group_by_year(holidays)))
}

#[derive(Debug, Deserialize)]
pub struct HolidayBody {
  pub date: NaiveDate,
  pub name: String,
}

/// `POST /holidays`
pub async fn create_holiday<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<HolidayBody>,
) -> Result<impl IntoResponse, ApiError> {
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("holiday name is empty".into()));
  }
  let holiday = store.insert_holiday(body.date, name).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(holiday)))
}
