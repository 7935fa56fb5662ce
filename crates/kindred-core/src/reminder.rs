//! Reminder digests: the upcoming-events window handed to a notifier.
//!
//! How (or whether) a digest is delivered is the [`Notifier`]'s business; the
//! core only decides what goes in it.

use std::future::Future;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  calendar::{CalendarEvent, EventKind, build_window_calendar},
  date::{RecurrenceWindow, next_monday},
  store::FamilyStore,
};

/// Default reminder horizon.
pub const DEFAULT_WEEKS: u64 = 4;

/// Someone who receives reminder digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
  pub name:  String,
  pub email: String,
}

/// The reminder window starting on the Monday on or after `today`.
pub fn default_window(today: NaiveDate, weeks: u64) -> Result<RecurrenceWindow> {
  RecurrenceWindow::starting_at(next_monday(today), weeks.saturating_mul(7))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderDigest {
  pub window: RecurrenceWindow,
  pub events: Vec<CalendarEvent>,
}

impl ReminderDigest {
  /// Build the digest for `window` from the store.
  pub async fn build<S: FamilyStore>(
    store: &S,
    window: RecurrenceWindow,
    include_holidays: bool,
  ) -> Result<Self> {
    let events = build_window_calendar(store, window, include_holidays).await?;
    Ok(Self { window, events })
  }

  pub fn subject(&self) -> String {
    format!("Family Reminders - {}", self.window.start().format("%a, %b %-d, %Y"))
  }

  /// Plain-text body addressed to `recipient_name`.
  pub fn render_text(&self, recipient_name: &str) -> String {
    let mut lines = vec![
      format!("Hi {recipient_name},"),
      String::new(),
      format!(
        "Upcoming family events from {} to {}:",
        self.window.start().format("%a, %b %-d, %Y"),
        self.window.end().format("%a, %b %-d, %Y"),
      ),
      String::new(),
    ];

    if self.events.is_empty() {
      lines.push("  Nothing coming up.".to_owned());
    }
    for event in &self.events {
      lines.push(format!(
        "  {:<12} {:<12} {}",
        self.when(event),
        kind_label(event.kind),
        self.describe(event)
      ));
    }

    let mut body = lines.join("\n");
    body.push('\n');
    body
  }

  fn when(&self, event: &CalendarEvent) -> String {
    match self.window.occurrence(event.on) {
      Some(day) => day.format("%a, %b %-d").to_string(),
      None => event.date.format("%b %-d").to_string(),
    }
  }

  /// Caption plus the milestone reached, for recurring events.
  fn describe(&self, event: &CalendarEvent) -> String {
    let years = self
      .window
      .occurrence(event.on)
      .map(|day| day.year() - event.date.year())
      .filter(|years| *years > 0);

    match (event.kind, years) {
      (EventKind::Birthday, Some(years)) => format!("{} (turns {years})", event.caption),
      (EventKind::Anniversary, Some(years)) => format!("{} ({years} years)", event.caption),
      _ => event.caption.clone(),
    }
  }
}

fn kind_label(kind: EventKind) -> &'static str {
  match kind {
    EventKind::Birthday => "Birthday",
    EventKind::Anniversary => "Anniversary",
    EventKind::Holiday => "Holiday",
  }
}

/// Outbound delivery of a digest.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn notify<'a>(
    &'a self,
    recipient: &'a Recipient,
    digest: &'a ReminderDigest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
