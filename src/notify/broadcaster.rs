//! Broadcast observer
//!
//! Fans derived records out to any number of live subscribers over a tokio
//! broadcast channel. Slow subscribers that fall behind the buffer miss
//! records; the sequence id lets them detect the gap.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::Observer;
use crate::types::LogRecord;
use crate::utils::now_millis;

/// A record plus delivery metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordNotice {
    pub record: LogRecord,
    /// Monotonically increasing, for gap detection
    pub sequence_id: u64,
    /// Unix milliseconds when the notice was sent
    pub timestamp: i64,
}

/// Observer publishing records on a broadcast channel
pub struct BroadcastObserver {
    tx: broadcast::Sender<RecordNotice>,
    sequence_counter: AtomicU64,
}

impl BroadcastObserver {
    /// Create a broadcaster buffering up to `capacity` notices per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordNotice> {
        self.tx.subscribe()
    }

    /// Subscribe as a stream, silently skipping over lagged gaps
    pub fn stream(&self) -> impl Stream<Item = RecordNotice> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|item| async move { item.ok() })
    }

    /// Number of notices sent so far
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Observer for BroadcastObserver {
    fn notify(&self, record: &LogRecord) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let notice = RecordNotice {
            record: record.clone(),
            sequence_id: seq,
            timestamp: now_millis(),
        };
        // No receivers is not an error
        let _ = self.tx.send(notice);
    }
}
