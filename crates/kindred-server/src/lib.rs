//! HTTP server and reminder runner for Kindred.
//!
//! Mounts the JSON API under `/api` behind a request trace layer, and sends
//! reminder digests through a [`Notifier`].

pub mod error;

pub use error::{Error, Result};

use std::{convert::Infallible, path::PathBuf, sync::Arc};

use axum::Router;
use kindred_api::api_router;
use kindred_core::{
  date::RecurrenceWindow,
  reminder::{DEFAULT_WEEKS, Notifier, Recipient, ReminderDigest},
  store::FamilyStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KINDRED_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  #[serde(default = "default_reminder_weeks")]
  pub reminder_weeks:   u64,
  #[serde(default = "default_include_holidays")]
  pub include_holidays: bool,
  #[serde(default)]
  pub recipients:       Vec<Recipient>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/kindred/kindred.db") }

fn default_reminder_weeks() -> u64 { DEFAULT_WEEKS }

fn default_include_holidays() -> bool { true }

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API nested under `/api`, every request traced.
pub fn router<S: FamilyStore + 'static>(store: Arc<S>) -> Router {
  Router::new()
    .nest("/api", api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Reminders ────────────────────────────────────────────────────────────────

/// A [`Notifier`] that writes each digest to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  type Error = Infallible;

  async fn notify<'a>(
    &'a self,
    recipient: &'a Recipient,
    digest: &'a ReminderDigest,
  ) -> Result<(), Infallible> {
    info!(
      to = %recipient.email,
      subject = %digest.subject(),
      events = digest.events.len(),
      body = %digest.render_text(&recipient.name),
      "reminder digest"
    );
    Ok(())
  }
}

/// Build one digest for `window` and hand it to `notifier` once per
/// recipient. Returns how many deliveries succeeded.
///
/// A failed delivery is logged and the rest still go out; the run only fails
/// if the digest cannot be built or every delivery failed.
#[tracing::instrument(skip_all, fields(start = %window.start(), recipients = recipients.len()))]
pub async fn send_reminders<S, N>(
  store: &S,
  notifier: &N,
  recipients: &[Recipient],
  window: RecurrenceWindow,
  include_holidays: bool,
) -> Result<usize>
where
  S: FamilyStore,
  N: Notifier,
{
  let digest = ReminderDigest::build(store, window, include_holidays).await?;

  let mut failed = 0;
  for recipient in recipients {
    if let Err(e) = notifier.notify(recipient, &digest).await {
      warn!(to = %recipient.email, error = %e, "reminder delivery failed");
      failed += 1;
    }
  }

  let sent = recipients.len() - failed;
  if sent == 0 && failed > 0 {
    return Err(Error::Undelivered { failed });
  }
  info!(sent, failed, events = digest.events.len(), "reminders sent");
  Ok(sent)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use chrono::NaiveDate;
  use kindred_core::person::{Gender, NewPerson};
  use kindred_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[derive(Default)]
  struct Recording {
    sent: Mutex<Vec<(String, String)>>,
  }

  #[derive(Debug, thiserror::Error)]
  #[error("mailbox unavailable")]
  struct Bounce;

  impl Notifier for Recording {
    type Error = Bounce;

    async fn notify<'a>(
      &'a self,
      recipient: &'a Recipient,
      digest: &'a ReminderDigest,
    ) -> Result<(), Bounce> {
      if recipient.email.ends_with("@bounce.test") {
        return Err(Bounce);
      }
      self
        .sent
        .lock()
        .unwrap()
        .push((recipient.email.clone(), digest.render_text(&recipient.name)));
      Ok(())
    }
  }

  fn recipient(name: &str, email: &str) -> Recipient {
    Recipient { name: name.into(), email: email.into() }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  async fn store_with_birthday() -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .insert_person(NewPerson {
        last_name: "Doe".into(),
        birth_date: Some(date(1990, 3, 20)),
        ..NewPerson::new("Jane", Gender::Female)
      })
      .await
      .unwrap();
    store
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        r#"
          port = 9000

          [[recipients]]
          name = "Sam"
          email = "sam@example.com"
        "#,
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();

    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.reminder_weeks, 4);
    assert!(cfg.include_holidays);
    assert_eq!(cfg.recipients, vec![recipient("Sam", "sam@example.com")]);
  }

  #[tokio::test]
  async fn reminders_go_to_every_recipient() {
    let store = store_with_birthday().await;
    let notifier = Recording::default();
    let window = RecurrenceWindow::starting_at(date(2024, 3, 18), 28).unwrap();
    let recipients = [recipient("Sam", "sam@example.com"), recipient("Lee", "lee@example.com")];

    let sent = send_reminders(&store, &notifier, &recipients, window, true).await.unwrap();
    assert_eq!(sent, 2);

    let log = notifier.sent.lock().unwrap();
    assert_eq!(log[0].0, "sam@example.com");
    assert!(log[0].1.starts_with("Hi Sam,"));
    assert!(log[1].1.contains("Jane Doe (turns 34)"));
  }

  #[tokio::test]
  async fn one_bounce_does_not_stop_the_rest() {
    let store = store_with_birthday().await;
    let notifier = Recording::default();
    let window = RecurrenceWindow::starting_at(date(2024, 3, 18), 28).unwrap();
    let recipients = [recipient("Bo", "bo@bounce.test"), recipient("Sam", "sam@example.com")];

    let sent = send_reminders(&store, &notifier, &recipients, window, true).await.unwrap();
    assert_eq!(sent, 1);

    let all_bounce = [recipient("Bo", "bo@bounce.test")];
    let err = send_reminders(&store, &notifier, &all_bounce, window, true).await.unwrap_err();
    assert!(matches!(err, Error::Undelivered { failed: 1 }));
  }

  #[tokio::test]
  async fn log_notifier_accepts_every_digest() {
    let store = store_with_birthday().await;
    let window = RecurrenceWindow::starting_at(date(2024, 3, 18), 28).unwrap();
    let sent = send_reminders(&store, &LogNotifier, &[recipient("Sam", "s@x.test")], window, false)
      .await
      .unwrap();
    assert_eq!(sent, 1);
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let app = router(Arc::new(SqliteStore::open_in_memory().await.unwrap()));

    let resp = app
      .clone()
      .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
      .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
