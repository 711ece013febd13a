//! Derived event records
//!
//! Records are immutable facts about what a message was before it changed or
//! disappeared. They are produced by the correlation engine and kept in the
//! retention logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author as resolved at the time a record was derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub discriminator: String,
}

impl AuthorInfo {
    /// `username#discriminator`
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }
}

/// A message that was deleted while its snapshot was cached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRecord {
    pub message_id: String,
    pub channel_id: String,
    pub channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub content: String,
    pub author: AuthorInfo,
    /// Original creation timestamp from the host payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Unix milliseconds when the deletion was observed
    pub deleted_at: i64,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub embeds: Vec<Value>,
}

/// A content-changing edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub message_id: String,
    pub channel_id: String,
    pub channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub old_content: String,
    pub new_content: String,
    pub author: AuthorInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<String>,
    /// Unix milliseconds when the edit was observed
    pub edited_at: i64,
}

/// One resolved member of a bulk deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkMember {
    pub message_id: String,
    pub content: String,
    pub author: AuthorInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A bulk deletion in one channel
///
/// `message_count` is the number of ids the host reported, which can exceed
/// `messages.len()` when some of them were never observed while live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeletionRecord {
    pub channel_id: String,
    pub channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub message_count: usize,
    pub messages: Vec<BulkMember>,
    pub deleted_at: i64,
}

impl BulkDeletionRecord {
    /// Number of requested ids with no cached snapshot
    pub fn unresolved_count(&self) -> usize {
        self.message_count.saturating_sub(self.messages.len())
    }
}

/// Which retention log a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Deleted,
    Edited,
    BulkDeleted,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Deleted => write!(f, "deleted"),
            RecordKind::Edited => write!(f, "edited"),
            RecordKind::BulkDeleted => write!(f, "bulk_deleted"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deleted" => Ok(RecordKind::Deleted),
            "edited" => Ok(RecordKind::Edited),
            "bulk" | "bulk_deleted" => Ok(RecordKind::BulkDeleted),
            other => Err(format!("unknown record kind '{}'", other)),
        }
    }
}

/// Any record, tagged the way the logs are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Deleted(DeletionRecord),
    Edited(EditRecord),
    BulkDeleted(BulkDeletionRecord),
}

impl LogRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            LogRecord::Deleted(_) => RecordKind::Deleted,
            LogRecord::Edited(_) => RecordKind::Edited,
            LogRecord::BulkDeleted(_) => RecordKind::BulkDeleted,
        }
    }

    pub fn channel_id(&self) -> &str {
        match self {
            LogRecord::Deleted(r) => &r.channel_id,
            LogRecord::Edited(r) => &r.channel_id,
            LogRecord::BulkDeleted(r) => &r.channel_id,
        }
    }
}
