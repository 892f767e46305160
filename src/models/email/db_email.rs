//! Database row for an email.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct DbEmail {
  pub id: i64,
  /// Provider-assigned message identifier, unique across the store.
  pub message_id: String,
  pub sender: Option<String>,
  pub recipient: Option<String>,
  pub subject: Option<String>,
  pub body_content: Option<String>,
  pub body_preview: Option<String>,
  pub received_datetime: Option<DateTime<Utc>>,
  pub sent_datetime: Option<DateTime<Utc>>,
  pub is_read: bool,
  pub direction: String,
  pub assigned_to_id: Option<i64>,
  pub assigned_to_name: Option<String>,
  pub assigned_by_id: Option<i64>,
  pub assigned_by_name: Option<String>,
  pub assigned_at: Option<DateTime<Utc>>,
  pub task_status: String,
}

/// Column list matching the `FromRow` field order above.
pub const EMAIL_COLUMNS: &str = "id, message_id, sender, recipient, subject, body_content, body_preview, received_datetime, sent_datetime, is_read, direction, assigned_to_id, assigned_to_name, assigned_by_id, assigned_by_name, assigned_at, task_status";
