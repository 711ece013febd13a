//! Record notifications
//!
//! When `showNotifications` is on, every derived record is handed to an
//! [`Observer`] injected at construction. The default writes a one-line
//! summary through `tracing`; [`BroadcastObserver`] fans records out to live
//! subscribers.

mod broadcaster;

use tracing::info;

use crate::types::LogRecord;
use crate::utils::truncate;

pub use broadcaster::{BroadcastObserver, RecordNotice};

/// Receives every record the engine derives while notifications are enabled
pub trait Observer: Send + Sync {
    fn notify(&self, record: &LogRecord);
}

/// Discards notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&self, _record: &LogRecord) {}
}

/// Emits notifications as `info` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, record: &LogRecord) {
        for line in notification_lines(record) {
            info!(kind = %record.kind(), channel_id = record.channel_id(), "{}", line);
        }
    }
}

/// Human-readable summary of a record
pub fn notification_lines(record: &LogRecord) -> Vec<String> {
    match record {
        LogRecord::Deleted(r) => vec![format!(
            "Deleted message from {}: {}",
            r.author.username,
            truncate(&r.content, 100)
        )],
        LogRecord::Edited(r) => vec![
            format!("Edited message from {}", r.author.username),
            format!("  Old: {}", truncate(&r.old_content, 100)),
            format!("  New: {}", truncate(&r.new_content, 100)),
        ],
        LogRecord::BulkDeleted(r) => vec![format!(
            "Bulk deleted {} messages in {}",
            r.message_count, r.channel_name
        )],
    }
}
