//! HTTP JSON mailbox backend.
//!
//! Talks to a REST mailbox service: `GET {base}/mailbox/{folder}/messages`
//! for the recent window and `GET {base}/messages/{id}/attachments/{att_id}`
//! for attachment bytes. Wire field names stay inside this module; the rest
//! of the crate sees only [`RemoteMessage`].

use crate::{
  error::Error,
  models::email::direction::Direction,
  provider::{MailProvider, RemoteAttachmentMeta, RemoteMessage},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Wire shape of a message as the mailbox service returns it.
#[derive(Debug, Deserialize)]
struct WireMessage {
  id: String,
  #[serde(default)]
  from: Option<String>,
  #[serde(default)]
  to: Option<String>,
  #[serde(default)]
  subject: Option<String>,
  #[serde(default)]
  body: Option<String>,
  #[serde(default)]
  preview: Option<String>,
  timestamp: DateTime<Utc>,
  #[serde(default)]
  read: bool,
  #[serde(default)]
  attachments: Vec<WireAttachment>,
}

#[derive(Debug, Deserialize)]
struct WireAttachment {
  id: String,
  name: String,
  #[serde(default = "default_content_type")]
  content_type: String,
  #[serde(default)]
  size: i64,
}

fn default_content_type() -> String {
  "application/octet-stream".to_string()
}

impl From<WireMessage> for RemoteMessage {
  fn from(w: WireMessage) -> Self {
    RemoteMessage {
      id: w.id,
      sender: w.from,
      recipient: w.to,
      subject: w.subject,
      body_content: w.body,
      body_preview: w.preview,
      timestamp: w.timestamp,
      is_read: w.read,
      attachments: w
        .attachments
        .into_iter()
        .map(|a| RemoteAttachmentMeta {
          id: a.id,
          name: a.name,
          content_type: a.content_type,
          size: a.size,
        })
        .collect(),
    }
  }
}

pub struct HttpMailProvider {
  client: reqwest::Client,
  base_url: String,
}

impl HttpMailProvider {
  /// Build a provider against `base_url`. Every request carries
  /// `request_timeout` so a wedged backend fails the pass instead of
  /// blocking it.
  pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, Error> {
    let client = reqwest::Client::builder()
      .timeout(request_timeout)
      .build()
      .map_err(|e| Error::Config(format!("http client: {e}")))?;
    Ok(HttpMailProvider {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  fn folder(direction: Direction) -> &'static str {
    match direction {
      Direction::Incoming => "inbox",
      Direction::Outgoing => "sent",
    }
  }
}

#[async_trait]
impl MailProvider for HttpMailProvider {
  async fn list_recent(
    &self,
    direction: Direction,
    limit: u32,
  ) -> Result<Vec<RemoteMessage>, Error> {
    let url = format!(
      "{}/mailbox/{}/messages",
      self.base_url,
      Self::folder(direction)
    );
    let res = self
      .client
      .get(&url)
      .query(&[("limit", limit)])
      .send()
      .await
      .map_err(|e| Error::Provider(format!("list {url}: {e}")))?;
    if !res.status().is_success() {
      return Err(Error::Provider(format!(
        "list {url}: status {}",
        res.status()
      )));
    }
    let wire: Vec<WireMessage> = res
      .json()
      .await
      .map_err(|e| Error::Provider(format!("list {url}: invalid body: {e}")))?;
    Ok(wire.into_iter().map(RemoteMessage::from).collect())
  }

  async fn download_attachment(
    &self,
    message_id: &str,
    attachment_id: &str,
  ) -> Result<Vec<u8>, Error> {
    let url = format!(
      "{}/messages/{}/attachments/{}",
      self.base_url, message_id, attachment_id
    );
    let res = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| Error::Provider(format!("download {url}: {e}")))?;
    if !res.status().is_success() {
      return Err(Error::Provider(format!(
        "download {url}: status {}",
        res.status()
      )));
    }
    let bytes = res
      .bytes()
      .await
      .map_err(|e| Error::Provider(format!("download {url}: {e}")))?;
    Ok(bytes.to_vec())
  }
}
