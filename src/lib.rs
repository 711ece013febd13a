//! Message Logger
//!
//! Captures chat message deletions, edits and bulk deletions from a host
//! application's event bus into bounded, newest-first in-memory logs, and
//! answers queries over that history while events keep flowing.
//!
//! # Features
//!
//! - **Before/after correlation**: every created message is cached so a later
//!   delete or edit can report what the message said
//! - **Bounded retention**: three capacity-bounded logs plus a bounded cache
//! - **Thread-Safe**: one `RwLock` over all logger state, so resets are atomic
//! - **Failure isolation**: a panicking handler is logged and contained
//! - **Commands**: `/msglog deleted|edited|bulk|stats|clear`
//!
//! # Modules
//!
//! - `types`: Snapshots, derived records, bus notifications, stats
//! - `cache`: Snapshot cache keyed by message id
//! - `retention`: Capacity-bounded newest-first log
//! - `engine`: Correlation and query over cache and logs
//! - `bus`: Event bus trait and the in-process `LocalBus`
//! - `subscription`: Binds engine handlers to a bus
//! - `directory`: Channel and user lookups
//! - `config`: Logger settings and their persistence
//! - `notify`: Record observers, including a tokio broadcast fan-out
//! - `commands`: `msglog` command and text reports
//! - `plugin`: Host-facing lifecycle
//! - `host`: Line-delimited JSON driver used by the `msglog` binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use message_logger::{EventBus, LocalBus, MemorySettings, MessageLoggerPlugin};
//! use message_logger::directory::NoDirectory;
//! use message_logger::notify::TracingObserver;
//!
//! fn main() -> message_logger::LoggerResult<()> {
//!     let bus = Arc::new(LocalBus::new());
//!     let plugin = MessageLoggerPlugin::new(
//!         Arc::new(MemorySettings::new()),
//!         Some(bus.clone() as Arc<dyn EventBus>),
//!         Arc::new(NoDirectory),
//!         Arc::new(TracingObserver),
//!     );
//!     plugin.start()?;
//!     plugin.stop();
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod cache;
pub mod commands;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod host;
pub mod notify;
pub mod plugin;
pub mod retention;
pub mod subscription;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use bus::{EventBus, HandlerId, LocalBus};
pub use cache::SnapshotCache;
pub use commands::{CollectedReplies, CommandRegistry, ReplyChannel};
pub use config::{JsonFileSettings, LoggerConfig, MemorySettings, SettingsStore};
pub use engine::{MessageLogger, RecentRecords, RecentView};
pub use error::{LoggerError, LoggerResult};
pub use host::HostDriver;
pub use plugin::MessageLoggerPlugin;
pub use retention::RetentionLog;
pub use subscription::{BindState, StartOutcome, SubscriptionManager};
pub use types::{
    BulkDeletionRecord, BusEvent, DeletionRecord, EditRecord, EventKind, LogRecord,
    LoggerStats, MessageSnapshot, RecordKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
