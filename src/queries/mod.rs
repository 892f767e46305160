//! Read-side listing queries for the request layer.

use crate::{
  error::Error,
  models::{
    attachment::attachment_meta::AttachmentMeta,
    email::{db_email::{DbEmail, EMAIL_COLUMNS}, direction::Direction, email_summary::EmailSummary},
    response::email_with_attachments::EmailWithAttachments,
  },
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Newest emails first, optionally filtered to one direction, each with its
/// attachment count.
pub async fn recent_emails(
  db: &SqlitePool,
  direction: Option<Direction>,
  limit: u32,
) -> Result<Vec<EmailSummary>, Error> {
  let base = "SELECT e.id, e.message_id, e.sender, e.subject, e.received_datetime, e.sent_datetime, e.direction, e.task_status, COUNT(a.id) AS attachment_count FROM emails e LEFT JOIN attachments a ON e.id = a.email_id";
  let tail = "GROUP BY e.id ORDER BY e.received_datetime DESC, e.sent_datetime DESC LIMIT ?";
  let rows = match direction {
    Some(d) => {
      let sql = format!("{base} WHERE e.direction = ? {tail}");
      sqlx::query_as::<_, EmailSummary>(&sql)
        .bind(d.as_str())
        .bind(limit as i64)
        .fetch_all(db)
        .await?
    }
    None => {
      let sql = format!("{base} {tail}");
      sqlx::query_as::<_, EmailSummary>(&sql)
        .bind(limit as i64)
        .fetch_all(db)
        .await?
    }
  };
  Ok(rows)
}

/// One email with its attachment metadata, or None.
pub async fn email_with_attachments(
  db: &SqlitePool,
  email_id: i64,
) -> Result<Option<EmailWithAttachments>, Error> {
  let sql = format!("SELECT {EMAIL_COLUMNS} FROM emails WHERE id = ?");
  let Some(email) = sqlx::query_as::<_, DbEmail>(&sql)
    .bind(email_id)
    .fetch_optional(db)
    .await?
  else {
    return Ok(None);
  };
  let attachments = sqlx::query_as::<_, AttachmentMeta>(
    "SELECT id, email_id, filename, original_filename, file_path, file_size, content_type, created_at FROM attachments WHERE email_id = ? ORDER BY id",
  )
  .bind(email_id)
  .fetch_all(db)
  .await?;
  Ok(Some(EmailWithAttachments { email, attachments }))
}

/// A task as seen from an assignee's worklist.
#[derive(Debug, Serialize, FromRow)]
pub struct TaskRow {
  pub id: i64,
  pub subject: Option<String>,
  pub sender: Option<String>,
  pub task_status: String,
  pub assigned_at: Option<DateTime<Utc>>,
}

/// Tasks assigned to one user: in_progress first, then pending, then the
/// rest, newest assignment first within each group.
pub async fn tasks_for_user(db: &SqlitePool, user_id: i64) -> Result<Vec<TaskRow>, Error> {
  let rows = sqlx::query_as::<_, TaskRow>(
    "SELECT id, subject, sender, task_status, assigned_at FROM emails WHERE assigned_to_id = ? ORDER BY CASE task_status WHEN 'in_progress' THEN 1 WHEN 'pending' THEN 2 ELSE 3 END, assigned_at DESC",
  )
  .bind(user_id)
  .fetch_all(db)
  .await?;
  Ok(rows)
}

/// An email carrying an active assignment.
#[derive(Debug, Serialize, FromRow)]
pub struct AssignedEmail {
  pub id: i64,
  pub subject: Option<String>,
  pub sender: Option<String>,
  pub task_status: String,
  pub assigned_to_id: i64,
  pub assigned_to_name: Option<String>,
  pub assigned_at: Option<DateTime<Utc>>,
}

/// Every assigned email, newest assignment first.
pub async fn emails_with_tasks(db: &SqlitePool) -> Result<Vec<AssignedEmail>, Error> {
  let rows = sqlx::query_as::<_, AssignedEmail>(
    "SELECT id, subject, sender, task_status, assigned_to_id, assigned_to_name, assigned_at FROM emails WHERE assigned_to_id IS NOT NULL ORDER BY assigned_at DESC",
  )
  .fetch_all(db)
  .await?;
  Ok(rows)
}
