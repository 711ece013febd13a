//! Message Logger engine
//!
//! Owns the snapshot cache and the three retention logs behind a single lock,
//! plus the collaborators used while deriving records (directory lookups and
//! the notification observer).
//!
//! ```text
//! bus handler ──► correlate::on_* ──► write lock ──► cache + logs
//!                                                      │
//! commands ─────► query::*   ──────► read lock ◄───────┘
//! ```
//!
//! Every handler holds the write lock for its full lookup/derive/record/put
//! sequence, and every query holds the read lock, so a reader never sees a log
//! mid-eviction or a partially applied reset.

mod correlate;
mod query;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::SnapshotCache;
use crate::config::LoggerConfig;
use crate::directory::{Directory, NoDirectory};
use crate::error::LoggerResult;
use crate::notify::{Observer, TracingObserver};
use crate::retention::RetentionLog;
use crate::types::{
    BulkDeletionRecord, BusEvent, DeletionRecord, EditRecord, LoggerStats, MessageSnapshot,
    RecordKind,
};

pub use query::{RecentRecords, RecentView};

/// Mutable state shared by the correlation and query paths
#[derive(Debug)]
pub(crate) struct LoggerState {
    pub(crate) cache: SnapshotCache,
    pub(crate) deleted: RetentionLog<DeletionRecord>,
    pub(crate) edited: RetentionLog<EditRecord>,
    pub(crate) bulk_deleted: RetentionLog<BulkDeletionRecord>,
}

impl LoggerState {
    fn new(config: &LoggerConfig) -> Self {
        Self {
            cache: SnapshotCache::new(config.max_cache_size),
            deleted: RetentionLog::new(config.max_log_size),
            edited: RetentionLog::new(config.max_log_size),
            bulk_deleted: RetentionLog::new(config.max_log_size),
        }
    }

    /// Apply new capacities, dropping the oldest entries that no longer fit
    fn resize(&mut self, config: &LoggerConfig) {
        self.cache.resize(config.max_cache_size);
        self.deleted.resize(config.max_log_size);
        self.edited.resize(config.max_log_size);
        self.bulk_deleted.resize(config.max_log_size);
    }
}

/// The event-capture and retention engine
pub struct MessageLogger {
    pub(crate) state: RwLock<LoggerState>,
    pub(crate) config: RwLock<LoggerConfig>,
    pub(crate) directory: Arc<dyn Directory>,
    pub(crate) observer: Arc<dyn Observer>,
}

impl MessageLogger {
    /// Create an engine with no directory and tracing notifications
    pub fn new(config: LoggerConfig) -> Self {
        let state = LoggerState::new(&config);
        Self {
            state: RwLock::new(state),
            config: RwLock::new(config),
            directory: Arc::new(NoDirectory),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Copy of the active configuration
    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Apply a new configuration
    ///
    /// Logs and cache are resized in place, keeping the newest entries that
    /// fit. Toggles take effect on the next bind.
    pub fn apply_config(&self, config: LoggerConfig) -> LoggerResult<()> {
        config.validate()?;

        let mut current = self.config.write();
        if current.max_log_size != config.max_log_size
            || current.max_cache_size != config.max_cache_size
        {
            self.state.write().resize(&config);
            info!(
                max_log_size = config.max_log_size,
                max_cache_size = config.max_cache_size,
                "Resized logs to new capacity"
            );
        }
        *current = config;
        Ok(())
    }

    /// Route a decoded notification to its handler
    pub fn handle(&self, event: &BusEvent) {
        match event {
            BusEvent::MessageCreate { message } => self.on_create(message.clone()),
            BusEvent::MessageDelete {
                channel_id,
                message_id,
            } => {
                self.on_delete(channel_id, message_id);
            }
            BusEvent::MessageUpdate { message } => {
                self.on_update(message.clone());
            }
            BusEvent::MessageDeleteBulk {
                channel_id,
                message_ids,
                requested,
            } => {
                correlate::on_bulk_delete(self, channel_id, message_ids, *requested);
            }
        }
    }

    pub fn on_create(&self, message: MessageSnapshot) {
        correlate::on_create(self, message)
    }

    pub fn on_delete(&self, channel_id: &str, message_id: &str) -> Option<DeletionRecord> {
        correlate::on_delete(self, channel_id, message_id)
    }

    pub fn on_update(&self, message: MessageSnapshot) -> Option<EditRecord> {
        correlate::on_update(self, message)
    }

    pub fn on_bulk_delete(&self, channel_id: &str, message_ids: &[String]) -> BulkDeletionRecord {
        correlate::on_bulk_delete(self, channel_id, message_ids, message_ids.len())
    }

    pub fn list_deleted(&self, n: usize) -> RecentView<DeletionRecord> {
        query::list_deleted(self, n)
    }

    pub fn list_edited(&self, n: usize) -> RecentView<EditRecord> {
        query::list_edited(self, n)
    }

    pub fn list_bulk(&self, n: usize) -> RecentView<BulkDeletionRecord> {
        query::list_bulk(self, n)
    }

    pub fn list_recent(&self, kind: RecordKind, n: usize) -> RecentRecords {
        query::list_recent(self, kind, n)
    }

    pub fn stats(&self) -> LoggerStats {
        query::stats(self)
    }

    pub fn reset_all(&self) {
        query::reset_all(self)
    }

    /// Cached snapshot for a message id
    pub fn cached(&self, message_id: &str) -> Option<Arc<MessageSnapshot>> {
        self.state.read().cache.get(message_id)
    }
}

impl Default for MessageLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}
