//! Composite response: one email plus its attachment metadata.

use crate::models::{attachment::attachment_meta::AttachmentMeta, email::db_email::DbEmail};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EmailWithAttachments {
  pub email: DbEmail,
  pub attachments: Vec<AttachmentMeta>,
}
