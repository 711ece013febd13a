//! Message snapshot types
//!
//! A snapshot is the last full state of a message seen on the bus. Host
//! payloads are loosely shaped, so every field except `id` tolerates absence,
//! `null`, and numbers where a string is expected. A wrong-typed optional
//! field reads as absent instead of failing the whole snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Author fields embedded in a message payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub discriminator: Option<String>,
}

impl MessageAuthor {
    pub fn new(id: &str, username: &str, discriminator: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            username: Some(username.to_string()),
            discriminator: Some(discriminator.to_string()),
        }
    }
}

/// Last observed state of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub channel_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: MessageAuthor,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub edited_timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub embeds: Vec<Value>,
}

impl MessageSnapshot {
    /// Create a snapshot with the given content and no author information
    pub fn new(id: &str, channel_id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            channel_id: Some(channel_id.to_string()),
            author: MessageAuthor::default(),
            content: content.to_string(),
            timestamp: None,
            edited_timestamp: None,
            attachments: Vec::new(),
            embeds: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: MessageAuthor) -> Self {
        self.author = author;
        self
    }

    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Mark the snapshot as an edit, as the host does on MESSAGE_UPDATE
    pub fn edited_at(mut self, edited_timestamp: &str) -> Self {
        self.edited_timestamp = Some(edited_timestamp.to_string());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Value>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// Read a JSON id that may arrive as a string or a number
pub(crate) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("expected a string or numeric id"))
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_from_value(&value))
}

/// Strings pass through, numbers are rendered, anything else is absent
fn opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_host_payload() {
        let snapshot: MessageSnapshot = serde_json::from_value(json!({
            "id": "100",
            "channel_id": "7",
            "author": {"id": "42", "username": "alice", "discriminator": "1234"},
            "content": "hello",
            "timestamp": "2024-01-01T00:00:00Z",
            "attachments": [{"url": "https://cdn/a.png"}],
            "embeds": null
        }))
        .unwrap();

        assert_eq!(snapshot.id, "100");
        assert_eq!(snapshot.channel_id.as_deref(), Some("7"));
        assert_eq!(snapshot.author.username.as_deref(), Some("alice"));
        assert_eq!(snapshot.attachments.len(), 1);
        assert!(snapshot.embeds.is_empty());
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_numeric_fields() {
        let snapshot: MessageSnapshot = serde_json::from_value(json!({
            "id": 555,
            "content": null,
            "author": null
        }))
        .unwrap();

        assert_eq!(snapshot.id, "555");
        assert_eq!(snapshot.content, "");
        assert_eq!(snapshot.channel_id, None);
        assert_eq!(snapshot.author, MessageAuthor::default());
    }

    #[test]
    fn test_wrong_typed_optional_fields_do_not_reject_snapshot() {
        let snapshot: MessageSnapshot = serde_json::from_value(json!({
            "id": "1",
            "content": "a",
            "timestamp": 1700000000000u64,
            "edited_timestamp": {"nested": true},
            "author": {"id": 42, "username": ["alice"], "discriminator": 1234}
        }))
        .unwrap();

        assert_eq!(snapshot.timestamp.as_deref(), Some("1700000000000"));
        assert_eq!(snapshot.edited_timestamp, None);
        assert_eq!(snapshot.author.id.as_deref(), Some("42"));
        assert_eq!(snapshot.author.username, None);
        assert_eq!(snapshot.author.discriminator.as_deref(), Some("1234"));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_value::<MessageSnapshot>(json!({"content": "x"}));
        assert!(result.is_err());
    }
}
