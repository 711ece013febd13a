//! Read-only views over the logs, plus the atomic reset

use tracing::info;

use crate::types::{BulkDeletionRecord, DeletionRecord, EditRecord, LoggerStats, RecordKind};

use super::MessageLogger;

/// The newest records of one log together with its total length
///
/// Both values come from the same read, so `records.len() <= total` always.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentView<T> {
    pub total: usize,
    pub records: Vec<T>,
}

impl<T> RecentView<T> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A [`RecentView`] of whichever log was asked for
#[derive(Debug, Clone, PartialEq)]
pub enum RecentRecords {
    Deleted(RecentView<DeletionRecord>),
    Edited(RecentView<EditRecord>),
    BulkDeleted(RecentView<BulkDeletionRecord>),
}

impl RecentRecords {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecentRecords::Deleted(_) => RecordKind::Deleted,
            RecentRecords::Edited(_) => RecordKind::Edited,
            RecentRecords::BulkDeleted(_) => RecordKind::BulkDeleted,
        }
    }

    pub fn total(&self) -> usize {
        match self {
            RecentRecords::Deleted(view) => view.total,
            RecentRecords::Edited(view) => view.total,
            RecentRecords::BulkDeleted(view) => view.total,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecentRecords::Deleted(view) => view.records.len(),
            RecentRecords::Edited(view) => view.records.len(),
            RecentRecords::BulkDeleted(view) => view.records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn list_deleted(logger: &MessageLogger, n: usize) -> RecentView<DeletionRecord> {
    let state = logger.state.read();
    RecentView {
        total: state.deleted.count(),
        records: state.deleted.recent(n),
    }
}

pub fn list_edited(logger: &MessageLogger, n: usize) -> RecentView<EditRecord> {
    let state = logger.state.read();
    RecentView {
        total: state.edited.count(),
        records: state.edited.recent(n),
    }
}

pub fn list_bulk(logger: &MessageLogger, n: usize) -> RecentView<BulkDeletionRecord> {
    let state = logger.state.read();
    RecentView {
        total: state.bulk_deleted.count(),
        records: state.bulk_deleted.recent(n),
    }
}

pub fn list_recent(logger: &MessageLogger, kind: RecordKind, n: usize) -> RecentRecords {
    match kind {
        RecordKind::Deleted => RecentRecords::Deleted(list_deleted(logger, n)),
        RecordKind::Edited => RecentRecords::Edited(list_edited(logger, n)),
        RecordKind::BulkDeleted => RecentRecords::BulkDeleted(list_bulk(logger, n)),
    }
}

pub fn stats(logger: &MessageLogger) -> LoggerStats {
    let state = logger.state.read();
    LoggerStats {
        deleted_count: state.deleted.count(),
        edited_count: state.edited.count(),
        bulk_deleted_count: state.bulk_deleted.count(),
        cached_message_count: state.cache.len(),
    }
}

/// Clear all three logs and the snapshot cache under one write lock
pub fn reset_all(logger: &MessageLogger) {
    let mut state = logger.state.write();
    state.deleted.clear();
    state.edited.clear();
    state.bulk_deleted.clear();
    state.cache.clear();
    info!("Message logs cleared");
}
