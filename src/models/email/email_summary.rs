//! List-view row: one email with its attachment count.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct EmailSummary {
  pub id: i64,
  pub message_id: String,
  pub sender: Option<String>,
  pub subject: Option<String>,
  pub received_datetime: Option<DateTime<Utc>>,
  pub sent_datetime: Option<DateTime<Utc>>,
  pub direction: String,
  pub task_status: String,
  pub attachment_count: i64,
}
