//! Aggregate counters exposed by the query layer

use serde::{Deserialize, Serialize};

/// Point-in-time counts across the three logs and the snapshot cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerStats {
    pub deleted_count: usize,
    pub edited_count: usize,
    pub bulk_deleted_count: usize,
    pub cached_message_count: usize,
}

impl LoggerStats {
    /// Total records held across all logs
    pub fn total_records(&self) -> usize {
        self.deleted_count + self.edited_count + self.bulk_deleted_count
    }

    /// True when nothing is logged or cached
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0 && self.cached_message_count == 0
    }
}
