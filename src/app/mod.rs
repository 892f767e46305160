//! Application setup and runtime.

use crate::{
  attach::AttachmentStore,
  db,
  error::Error,
  provider::http::HttpMailProvider,
  scheduler::Scheduler,
  sync::SyncEngine,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runtime configuration, read from `MAILDESK_*` environment variables with
/// defaults matching the original deployment (2-hour cadence, 50-message
/// window, 5-second startup delay).
#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub attachment_dir: PathBuf,
  pub provider_url: String,
  pub fetch_limit: u32,
  pub resync_limit: u32,
  pub sync_interval: Duration,
  pub startup_delay: Duration,
  pub request_timeout: Duration,
}

fn env_u64(key: &str, default: u64) -> Result<u64, Error> {
  match std::env::var(key) {
    Ok(v) => v
      .parse()
      .map_err(|_| Error::Config(format!("{key} must be a number, got {v:?}"))),
    Err(_) => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> Result<Self, Error> {
    Ok(Config {
      database_url: std::env::var("MAILDESK_DATABASE")
        .unwrap_or_else(|_| "sqlite://maildesk.db".to_string()),
      attachment_dir: std::env::var("MAILDESK_ATTACHMENT_DIR")
        .unwrap_or_else(|_| "attachments".to_string())
        .into(),
      provider_url: std::env::var("MAILDESK_PROVIDER_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8025".to_string()),
      fetch_limit: env_u64("MAILDESK_FETCH_LIMIT", 50)? as u32,
      resync_limit: env_u64("MAILDESK_RESYNC_LIMIT", 200)? as u32,
      sync_interval: Duration::from_secs(env_u64("MAILDESK_SYNC_INTERVAL_SECS", 2 * 60 * 60)?),
      startup_delay: Duration::from_secs(env_u64("MAILDESK_STARTUP_DELAY_SECS", 5)?),
      request_timeout: Duration::from_secs(env_u64("MAILDESK_REQUEST_TIMEOUT_SECS", 30)?),
    })
  }
}

/// Start the sync runtime: connect, migrate, wire the engine and run the
/// scheduler until ctrl-c.
pub async fn run() -> Result<(), Error> {
  crate::util::init_tracing();

  let config = Config::from_env()?;
  let db_url = db::ensure_sqlite_path(&config.database_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let provider = Arc::new(HttpMailProvider::new(
    &config.provider_url,
    config.request_timeout,
  )?);
  let attachments = AttachmentStore::new(pool.clone(), config.attachment_dir.clone());
  let engine = Arc::new(SyncEngine::new(
    pool.clone(),
    provider,
    attachments,
    config.fetch_limit,
    config.resync_limit,
  ));
  let scheduler = Scheduler::new(engine, config.sync_interval, config.startup_delay);

  info!(
    provider = %config.provider_url,
    interval_secs = config.sync_interval.as_secs(),
    fetch_limit = config.fetch_limit,
    "maildesk starting"
  );

  scheduler.start().await;
  tokio::signal::ctrl_c().await?;
  info!("shutdown signal received");
  scheduler.stop().await;
  Ok(())
}
