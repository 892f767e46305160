#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use maildesk::db;
use maildesk::error::Error;
use maildesk::models::email::{db_email::DbEmail, direction::Direction};
use maildesk::provider::{MailProvider, RemoteAttachmentMeta, RemoteMessage};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub async fn make_pool() -> SqlitePool {
    // One connection: each sqlite :memory: connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    pool
}

pub fn ts(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, min, 0).unwrap()
}

pub fn msg(id: &str, timestamp: DateTime<Utc>) -> RemoteMessage {
    RemoteMessage {
        id: id.to_string(),
        sender: Some("alice@example.test".to_string()),
        recipient: Some("team@example.test".to_string()),
        subject: Some(format!("subject {id}")),
        body_content: Some("body".to_string()),
        body_preview: Some("preview".to_string()),
        timestamp,
        is_read: false,
        attachments: Vec::new(),
    }
}

pub fn attachment_meta(id: &str, name: &str) -> RemoteAttachmentMeta {
    RemoteAttachmentMeta {
        id: id.to_string(),
        name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        size: 0,
    }
}

/// Provider fake driven entirely by the test: fixed message lists per
/// direction, an attachment byte map, and failure switches.
#[derive(Default)]
pub struct ScriptedProvider {
    pub incoming: Mutex<Vec<RemoteMessage>>,
    pub outgoing: Mutex<Vec<RemoteMessage>>,
    pub attachment_bytes: Mutex<HashMap<(String, String), Vec<u8>>>,
    pub failing_attachments: Mutex<HashSet<String>>,
    pub fail_listing: AtomicBool,
    pub list_calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn set_incoming(&self, messages: Vec<RemoteMessage>) {
        *self.incoming.lock().unwrap() = messages;
    }

    pub fn set_outgoing(&self, messages: Vec<RemoteMessage>) {
        *self.outgoing.lock().unwrap() = messages;
    }

    pub fn put_attachment(&self, message_id: &str, attachment_id: &str, bytes: &[u8]) {
        self.attachment_bytes.lock().unwrap().insert(
            (message_id.to_string(), attachment_id.to_string()),
            bytes.to_vec(),
        );
    }

    pub fn fail_attachment(&self, attachment_id: &str) {
        self.failing_attachments
            .lock()
            .unwrap()
            .insert(attachment_id.to_string());
    }
}

#[async_trait]
impl MailProvider for ScriptedProvider {
    async fn list_recent(
        &self,
        direction: Direction,
        limit: u32,
    ) -> Result<Vec<RemoteMessage>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Error::Provider("scripted listing failure".to_string()));
        }
        let source = match direction {
            Direction::Incoming => self.incoming.lock().unwrap(),
            Direction::Outgoing => self.outgoing.lock().unwrap(),
        };
        Ok(source.iter().take(limit as usize).cloned().collect())
    }

    async fn download_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Vec<u8>, Error> {
        if self
            .failing_attachments
            .lock()
            .unwrap()
            .contains(attachment_id)
        {
            return Err(Error::Provider("scripted download failure".to_string()));
        }
        self.attachment_bytes
            .lock()
            .unwrap()
            .get(&(message_id.to_string(), attachment_id.to_string()))
            .cloned()
            .ok_or_else(|| Error::Provider(format!("no bytes scripted for {attachment_id}")))
    }
}

/// Insert a bare incoming email row directly, for task tests that do not go
/// through the sync engine.
pub async fn insert_email(pool: &SqlitePool, message_id: &str) -> i64 {
    let res = sqlx::query(
        "INSERT INTO emails (message_id, sender, recipient, subject, received_datetime, is_read, direction, created_at) VALUES (?, 'a@example.test', 'b@example.test', 'subject', ?, 0, 'incoming', ?)",
    )
    .bind(message_id)
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("insert email");
    res.last_insert_rowid()
}

pub async fn fetch_email(pool: &SqlitePool, id: i64) -> DbEmail {
    let sql = format!(
        "SELECT {} FROM emails WHERE id = ?",
        maildesk::models::email::db_email::EMAIL_COLUMNS
    );
    sqlx::query_as::<_, DbEmail>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("fetch email")
}

pub async fn email_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM emails")
        .fetch_one(pool)
        .await
        .expect("count emails")
}
