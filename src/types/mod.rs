//! Data types for the message logger
//!
//! Snapshots of live messages, the records derived from them, the typed bus
//! notifications, and the aggregate stats.

mod notification;
mod record;
mod snapshot;
mod stats;

pub use notification::{BusEvent, EventKind};
pub use record::{
    AuthorInfo, BulkDeletionRecord, BulkMember, DeletionRecord, EditRecord, LogRecord, RecordKind,
};
pub use snapshot::{MessageAuthor, MessageSnapshot};
pub use stats::LoggerStats;

/// Username used when neither the directory nor the snapshot knows the author
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Discriminator used when neither the directory nor the snapshot has one
pub const UNKNOWN_DISCRIMINATOR: &str = "0000";

/// Channel name used when the directory cannot resolve the channel
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";
