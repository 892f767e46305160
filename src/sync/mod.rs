//! Incremental mailbox sync.
//!
//! One pass per direction: compute the watermark from stored rows, fetch a
//! bounded window of recent candidates, skip everything at or below the
//! watermark, dedup on `message_id`, insert what is left and pull down its
//! attachments. Passes are idempotent; re-running against an unchanged
//! provider inserts nothing.

use crate::{
  attach::AttachmentStore,
  error::Error,
  models::email::direction::Direction,
  provider::{MailProvider, RemoteMessage},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Counts from one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
  /// Candidates returned by the provider and evaluated.
  pub checked: u64,
  /// New emails actually inserted.
  pub inserted: u64,
}

pub struct SyncEngine {
  db: SqlitePool,
  provider: Arc<dyn MailProvider>,
  attachments: AttachmentStore,
  /// Bounded window per pass. If more than this many new messages arrived
  /// upstream since the last pass, the oldest of that backlog is never
  /// fetched; there is no continuation cursor.
  fetch_limit: u32,
  /// Larger window used by [`SyncEngine::force_resync`].
  resync_limit: u32,
}

impl SyncEngine {
  pub fn new(
    db: SqlitePool,
    provider: Arc<dyn MailProvider>,
    attachments: AttachmentStore,
    fetch_limit: u32,
    resync_limit: u32,
  ) -> Self {
    SyncEngine {
      db,
      provider,
      attachments,
      fetch_limit,
      resync_limit,
    }
  }

  /// Max stored direction timestamp, or None when the store holds nothing
  /// for that direction. Recomputed fresh on every pass; never persisted.
  async fn watermark(&self, direction: Direction) -> Result<Option<DateTime<Utc>>, Error> {
    let sql = format!(
      "SELECT MAX({}) FROM emails WHERE direction = ?",
      direction.timestamp_column()
    );
    let max: Option<DateTime<Utc>> = sqlx::query_scalar(&sql)
      .bind(direction.as_str())
      .fetch_one(&self.db)
      .await?;
    Ok(max)
  }

  async fn email_exists(&self, message_id: &str) -> Result<bool, Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM emails WHERE message_id = ?")
      .bind(message_id)
      .fetch_optional(&self.db)
      .await?;
    Ok(found.is_some())
  }

  /// Insert a new email row. Returns the row id, or None when a concurrent
  /// pass inserted the same `message_id` first — the unique constraint is
  /// the correctness backstop, and losing that race is a skip, not an error.
  async fn insert_email(
    &self,
    msg: &RemoteMessage,
    direction: Direction,
  ) -> Result<Option<i64>, Error> {
    let (received, sent) = match direction {
      Direction::Incoming => (Some(msg.timestamp), None),
      Direction::Outgoing => (None, Some(msg.timestamp)),
    };
    let res = sqlx::query(
      "INSERT INTO emails (message_id, sender, recipient, subject, body_content, body_preview, received_datetime, sent_datetime, is_read, direction, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT(message_id) DO NOTHING",
    )
    .bind(&msg.id)
    .bind(&msg.sender)
    .bind(&msg.recipient)
    .bind(&msg.subject)
    .bind(&msg.body_content)
    .bind(&msg.body_preview)
    .bind(received)
    .bind(sent)
    .bind(msg.is_read)
    .bind(direction.as_str())
    .bind(Utc::now())
    .execute(&self.db)
    .await?;
    if res.rows_affected() == 0 {
      return Ok(None);
    }
    Ok(Some(res.last_insert_rowid()))
  }

  /// Download and persist every attachment of an inserted email. Failures
  /// are isolated per attachment: the email row stays, siblings and later
  /// candidates continue.
  async fn ingest_attachments(&self, email_id: i64, msg: &RemoteMessage, direction: Direction) {
    for att in &msg.attachments {
      let bytes = match self.provider.download_attachment(&msg.id, &att.id).await {
        Ok(b) => b,
        Err(e) => {
          error!(
            email_id,
            attachment = %att.name,
            error = %e,
            "attachment download failed, skipping"
          );
          continue;
        }
      };
      if let Err(e) = self
        .attachments
        .store(email_id, &att.name, &att.content_type, &bytes, direction)
        .await
      {
        error!(
          email_id,
          attachment = %att.name,
          error = %e,
          "attachment store failed, skipping"
        );
      }
    }
  }

  async fn sync_window(
    &self,
    direction: Direction,
    watermark: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<SyncReport, Error> {
    // A provider failure here aborts the whole pass; nothing has been
    // written yet and the next tick retries.
    let candidates = self.provider.list_recent(direction, limit).await?;

    let mut checked = 0u64;
    let mut inserted = 0u64;
    for msg in &candidates {
      checked += 1;

      // Provider order is not guaranteed monotonic, so a stale candidate is
      // skipped and the scan continues instead of stopping early.
      if let Some(wm) = watermark {
        if msg.timestamp <= wm {
          debug!(message_id = %msg.id, %direction, "at or below watermark, skipping");
          continue;
        }
      }

      if self.email_exists(&msg.id).await? {
        debug!(message_id = %msg.id, %direction, "already stored, skipping");
        continue;
      }

      let Some(email_id) = self.insert_email(msg, direction).await? else {
        debug!(message_id = %msg.id, %direction, "lost insert race, skipping");
        continue;
      };
      inserted += 1;

      if !msg.attachments.is_empty() {
        self.ingest_attachments(email_id, msg, direction).await;
      }
    }

    Ok(SyncReport { checked, inserted })
  }

  /// One incremental pass for a direction. Idempotent net effect on storage.
  pub async fn sync(&self, direction: Direction) -> Result<SyncReport, Error> {
    let watermark = self.watermark(direction).await?;
    match watermark {
      Some(wm) => debug!(%direction, watermark = %wm, "starting sync pass"),
      None => debug!(%direction, "store empty for direction, taking full window"),
    }
    let report = self.sync_window(direction, watermark, self.fetch_limit).await?;
    info!(
      %direction,
      checked = report.checked,
      inserted = report.inserted,
      "sync pass finished"
    );
    Ok(report)
  }

  /// Run one pass for both directions, logging failures instead of
  /// propagating them. This is what the scheduler calls on each tick.
  pub async fn run_pass(&self) {
    for direction in [Direction::Incoming, Direction::Outgoing] {
      if let Err(e) = self.sync(direction).await {
        error!(%direction, error = %e, "sync pass failed");
      }
    }
  }

  /// Dedup-only backfill over a larger window, ignoring the watermark. Picks
  /// up messages the incremental pass can no longer see, e.g. after a
  /// partial ingest. Returns per-direction reports.
  pub async fn force_resync(&self) -> Result<Vec<(Direction, SyncReport)>, Error> {
    warn!("force resync requested, scanning without watermark");
    let mut out = Vec::new();
    for direction in [Direction::Incoming, Direction::Outgoing] {
      let report = self.sync_window(direction, None, self.resync_limit).await?;
      info!(
        %direction,
        checked = report.checked,
        inserted = report.inserted,
        "force resync finished"
      );
      out.push((direction, report));
    }
    Ok(out)
  }
}
