//! Database helpers: migrations, path handling, bootstrap and reset.

use crate::{error::Error, models::user::user_row::Role};
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;

/// Run SQLite migrations to create tables if absent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
  sqlx::query(
    r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Employee',
            created_at TEXT NOT NULL
        )"#,
  )
  .execute(pool)
  .await?;

  sqlx::query(
    r#"CREATE TABLE IF NOT EXISTS emails (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            message_id TEXT NOT NULL UNIQUE,
            sender TEXT NULL,
            recipient TEXT NULL,
            subject TEXT NULL,
            body_content TEXT NULL,
            body_preview TEXT NULL,
            received_datetime TEXT NULL,
            sent_datetime TEXT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            direction TEXT NOT NULL,
            assigned_to_id INTEGER NULL,
            assigned_to_name TEXT NULL,
            assigned_by_id INTEGER NULL,
            assigned_by_name TEXT NULL,
            assigned_at TEXT NULL,
            task_status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            FOREIGN KEY (assigned_to_id) REFERENCES users (id),
            FOREIGN KEY (assigned_by_id) REFERENCES users (id)
        )"#,
  )
  .execute(pool)
  .await?;

  sqlx::query(
    r#"CREATE TABLE IF NOT EXISTS attachments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email_id INTEGER NOT NULL,
            filename TEXT NOT NULL,
            original_filename TEXT NOT NULL,
            file_path TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            content_type TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (email_id) REFERENCES emails (id)
        )"#,
  )
  .execute(pool)
  .await?;
  Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
  if !db_url.starts_with("sqlite:") {
    return db_url.to_string();
  }
  let path_part = db_url.trim_start_matches("sqlite://");
  let path_part = path_part.trim_start_matches("sqlite:");
  if path_part == ":memory:" || path_part.is_empty() {
    return db_url.to_string();
  }
  let (path_only, _) = match path_part.split_once('?') {
    Some((p, q)) => (p, Some(q)),
    None => (path_part, None),
  };
  let p = Path::new(path_only);
  if let Some(parent) = p.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent).ok();
    }
  }
  if !p.exists() {
    std::fs::File::create(p).ok();
  }
  db_url.to_string()
}

/// Insert a user and return its id. The unique email constraint surfaces as
/// a database error on duplicates.
pub async fn create_user(
  pool: &SqlitePool,
  email: &str,
  name: &str,
  role: Role,
) -> Result<i64, Error> {
  let res = sqlx::query("INSERT INTO users (email, name, role, created_at) VALUES (?, ?, ?, ?)")
    .bind(email)
    .bind(name)
    .bind(role.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;
  Ok(res.last_insert_rowid())
}

/// Bulk reset: drop every stored email and attachment row and rewind the
/// autoincrement counters. Users are kept. This is the only deletion path
/// in the whole crate.
pub async fn reset_store(pool: &SqlitePool) -> Result<(), Error> {
  sqlx::query("DELETE FROM attachments").execute(pool).await?;
  sqlx::query("DELETE FROM emails").execute(pool).await?;
  sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('emails', 'attachments')")
    .execute(pool)
    .await?;
  Ok(())
}
