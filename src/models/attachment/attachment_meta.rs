//! Attachment metadata row.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct AttachmentMeta {
  pub id: i64,
  pub email_id: i64,
  /// Generated on-disk name (original stem plus ingestion time stamp).
  pub filename: String,
  pub original_filename: String,
  pub file_path: String,
  pub file_size: i64,
  pub content_type: String,
  pub created_at: DateTime<Utc>,
}
