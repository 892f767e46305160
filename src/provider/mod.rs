//! Mail provider abstraction.
//!
//! The sync engine only ever sees the canonical [`RemoteMessage`] shape
//! defined here. Whatever wire format a concrete backend speaks is adapted
//! inside that backend (`http`), never propagated into the engine.

use crate::{error::Error, models::email::direction::Direction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod http;

/// Attachment descriptor as reported by the provider. Bytes are fetched
/// separately via [`MailProvider::download_attachment`].
#[derive(Debug, Clone)]
pub struct RemoteAttachmentMeta {
  pub id: String,
  pub name: String,
  pub content_type: String,
  pub size: i64,
}

/// Canonical message shape consumed by the sync engine.
#[derive(Debug, Clone)]
pub struct RemoteMessage {
  /// Provider-assigned identifier, used as the dedup key.
  pub id: String,
  pub sender: Option<String>,
  pub recipient: Option<String>,
  pub subject: Option<String>,
  pub body_content: Option<String>,
  pub body_preview: Option<String>,
  /// Received time for incoming messages, sent time for outgoing ones.
  pub timestamp: DateTime<Utc>,
  pub is_read: bool,
  pub attachments: Vec<RemoteAttachmentMeta>,
}

/// A remote mailbox backend.
#[async_trait]
pub trait MailProvider: Send + Sync {
  /// Fetch up to `limit` of the most recent messages for a folder. A bounded
  /// window, not a cursor: backlog beyond `limit` is not retrievable.
  async fn list_recent(
    &self,
    direction: Direction,
    limit: u32,
  ) -> Result<Vec<RemoteMessage>, Error>;

  /// Download the bytes of a single attachment.
  async fn download_attachment(
    &self,
    message_id: &str,
    attachment_id: &str,
  ) -> Result<Vec<u8>, Error>;
}
