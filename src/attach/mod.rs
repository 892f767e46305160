//! Attachment persistence: date-partitioned files plus metadata rows.

use crate::{error::Error, models::email::direction::Direction};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes attachment bytes under `base_dir/direction/YYYY/MM/DD/` and
/// records a metadata row linked to the owning email.
#[derive(Clone)]
pub struct AttachmentStore {
  db: SqlitePool,
  base_dir: PathBuf,
}

/// Stored name: original stem, an HHMMSS stamp of the ingestion instant,
/// original extension. Two same-stem attachments landing in the same
/// partition within the same second will collide; callers accepting that
/// risk is a documented constraint, not an accident.
fn derive_filename(original_name: &str, now: DateTime<Utc>) -> String {
  let p = Path::new(original_name);
  let stem = p
    .file_stem()
    .and_then(|s| s.to_str())
    .unwrap_or("attachment");
  let stamp = now.format("%H%M%S");
  match p.extension().and_then(|e| e.to_str()) {
    Some(ext) => format!("{stem}_{stamp}.{ext}"),
    None => format!("{stem}_{stamp}"),
  }
}

impl AttachmentStore {
  pub fn new(db: SqlitePool, base_dir: impl Into<PathBuf>) -> Self {
    AttachmentStore {
      db,
      base_dir: base_dir.into(),
    }
  }

  /// Persist one attachment for `email_id`. Fails without writing anything
  /// when the source bytes are empty: a descriptor with no content means the
  /// download went wrong, and a silent zero-byte file would hide that.
  pub async fn store(
    &self,
    email_id: i64,
    original_name: &str,
    content_type: &str,
    bytes: &[u8],
    direction: Direction,
  ) -> Result<i64, Error> {
    if bytes.is_empty() {
      return Err(Error::EmptyAttachment(original_name.to_string()));
    }

    // Partition by the ingestion instant, not the message's own timestamp.
    let now = Utc::now();
    let dir = self
      .base_dir
      .join(direction.as_str())
      .join(now.format("%Y").to_string())
      .join(now.format("%m").to_string())
      .join(now.format("%d").to_string());
    tokio::fs::create_dir_all(&dir).await?;

    let filename = derive_filename(original_name, now);
    let file_path = dir.join(&filename);
    tokio::fs::write(&file_path, bytes).await?;

    let stored_path = file_path.to_string_lossy().into_owned();
    let res = sqlx::query(
      "INSERT INTO attachments (email_id, filename, original_filename, file_path, file_size, content_type, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(email_id)
    .bind(&filename)
    .bind(original_name)
    .bind(&stored_path)
    .bind(bytes.len() as i64)
    .bind(content_type)
    .bind(now)
    .execute(&self.db)
    .await?;

    info!(
      email_id,
      filename = %filename,
      size = bytes.len(),
      "stored attachment"
    );
    Ok(res.last_insert_rowid())
  }
}

#[cfg(test)]
mod tests {
  use super::derive_filename;
  use chrono::{TimeZone, Utc};

  #[test]
  fn filename_keeps_stem_and_extension() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    assert_eq!(derive_filename("report.pdf", at), "report_140507.pdf");
  }

  #[test]
  fn filename_without_extension() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    assert_eq!(derive_filename("README", at), "README_140507");
  }

  #[test]
  fn filename_with_dotted_stem() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 1).unwrap();
    assert_eq!(derive_filename("archive.tar.gz", at), "archive.tar_000001.gz");
  }
}
