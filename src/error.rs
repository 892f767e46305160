//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Db(#[from] sqlx::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Failure reaching the mail provider. Aborts the current sync pass;
  /// the next scheduled tick retries from a fresh watermark.
  #[error("mail provider error: {0}")]
  Provider(String),

  #[error("user {0} not found")]
  UserNotFound(i64),

  #[error("user {0} does not have the Manager role")]
  NotManager(i64),

  #[error("email {0} not found")]
  EmailNotFound(i64),

  /// Zero-rows-affected outcome of an ownership-guarded update. Covers both
  /// "no such email" and "not yours" without a separate existence check.
  #[error("task not found or no permission")]
  NoPermission,

  #[error("invalid task status: {0:?}")]
  InvalidStatus(String),

  #[error("status in_progress requires an assignee")]
  MissingAssignee,

  #[error("attachment {0:?} has no content")]
  EmptyAttachment(String),

  #[error("invalid configuration: {0}")]
  Config(String),
}
