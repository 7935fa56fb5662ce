//! kindred-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `KINDRED_*` environment variables, opens the SQLite store, and either
//! serves the JSON API or sends one round of reminder digests.
//!
//! ```text
//! kindred-server serve
//! kindred-server reminders --start 2024-12-23
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use kindred_core::{
  date::RecurrenceWindow,
  reminder::{ReminderDigest, default_window},
};
use kindred_server::{LogNotifier, ServerConfig, send_reminders};
use kindred_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Kindred family record keeper")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API.
  Serve,

  /// Build the reminder digest and deliver it to every configured recipient.
  Reminders {
    /// First day of the window (YYYY-MM-DD). Defaults to the Monday on or
    /// after today.
    #[arg(long)]
    start: Option<NaiveDate>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("KINDRED"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Serve => serve(store, &server_cfg).await,
    Command::Reminders { start } => reminders(store, &server_cfg, start).await,
  }
}

async fn serve(store: SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = kindred_server::router(Arc::new(store));
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn reminders(
  store: SqliteStore,
  cfg: &ServerConfig,
  start: Option<NaiveDate>,
) -> anyhow::Result<()> {
  let window = match start {
    Some(start) => RecurrenceWindow::starting_at(start, cfg.reminder_weeks.saturating_mul(7)),
    None => default_window(Local::now().date_naive(), cfg.reminder_weeks),
  }
  .context("invalid reminder window")?;

  if cfg.recipients.is_empty() {
    tracing::warn!("no recipients configured; printing the digest instead");
    let digest = ReminderDigest::build(&store, window, cfg.include_holidays)
      .await
      .context("failed to build reminder digest")?;
    println!("{}\n\n{}", digest.subject(), digest.render_text("family"));
    return Ok(());
  }

  send_reminders(&store, &LogNotifier, &cfg.recipients, window, cfg.include_holidays)
    .await
    .context("failed to send reminders")?;
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
