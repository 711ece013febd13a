//! Inbound bus notifications
//!
//! The host delivers four message lifecycle notifications by name. Raw
//! payloads are decoded into [`BusEvent`]; a payload that is missing what its
//! kind needs is "not applicable" and decodes to `None` rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::snapshot::{id_from_value, MessageSnapshot};

/// Notification kinds the logger subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "MESSAGE_CREATE")]
    MessageCreate,
    #[serde(rename = "MESSAGE_DELETE")]
    MessageDelete,
    #[serde(rename = "MESSAGE_UPDATE")]
    MessageUpdate,
    #[serde(rename = "MESSAGE_DELETE_BULK")]
    MessageDeleteBulk,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::MessageCreate,
        EventKind::MessageDelete,
        EventKind::MessageUpdate,
        EventKind::MessageDeleteBulk,
    ];

    /// Wire name used by the host bus
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MessageCreate => "MESSAGE_CREATE",
            EventKind::MessageDelete => "MESSAGE_DELETE",
            EventKind::MessageUpdate => "MESSAGE_UPDATE",
            EventKind::MessageDeleteBulk => "MESSAGE_DELETE_BULK",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded lifecycle notification
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    MessageCreate {
        message: MessageSnapshot,
    },
    MessageDelete {
        channel_id: String,
        message_id: String,
    },
    /// Only produced for payloads carrying an edited-timestamp marker
    MessageUpdate {
        message: MessageSnapshot,
    },
    /// `requested` counts every id the host sent, including malformed ones
    /// that could not become `message_ids`
    MessageDeleteBulk {
        channel_id: String,
        message_ids: Vec<String>,
        requested: usize,
    },
}

impl BusEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BusEvent::MessageCreate { .. } => EventKind::MessageCreate,
            BusEvent::MessageDelete { .. } => EventKind::MessageDelete,
            BusEvent::MessageUpdate { .. } => EventKind::MessageUpdate,
            BusEvent::MessageDeleteBulk { .. } => EventKind::MessageDeleteBulk,
        }
    }

    /// Decode a raw host payload carrying its kind in `type`
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = EventKind::from_name(value.get("type")?.as_str()?)?;
        Self::from_kind_and_value(kind, value)
    }

    /// Decode a raw payload whose kind is known out of band
    pub fn from_kind_and_value(kind: EventKind, value: &Value) -> Option<Self> {
        match kind {
            EventKind::MessageCreate => {
                let message = decode_message(value.get("message")?)?;
                Some(BusEvent::MessageCreate { message })
            }
            EventKind::MessageDelete => Some(BusEvent::MessageDelete {
                channel_id: id_from_value(value.get("channelId")?)?,
                message_id: id_from_value(value.get("id")?)?,
            }),
            EventKind::MessageUpdate => {
                let raw = value.get("message")?;
                // Without content there is nothing to compare against
                raw.get("content")?.as_str()?;
                let message = decode_message(raw)?;
                message.edited_timestamp.as_ref()?;
                Some(BusEvent::MessageUpdate { message })
            }
            EventKind::MessageDeleteBulk => {
                let channel_id = id_from_value(value.get("channelId")?)?;
                let ids = value.get("ids")?.as_array()?;
                Some(BusEvent::MessageDeleteBulk {
                    channel_id,
                    message_ids: ids.iter().filter_map(id_from_value).collect(),
                    requested: ids.len(),
                })
            }
        }
    }
}

fn decode_message(value: &Value) -> Option<MessageSnapshot> {
    serde_json::from_value(value.clone()).ok()
}
