//! Error types for the message logger
//!
//! Every failure here is recoverable: the worst outcome for the host is that
//! logging stops, never that it crashes.

use thiserror::Error;

use crate::bus::HandlerId;
use crate::types::EventKind;

/// Result type for message logger operations
pub type LoggerResult<T> = Result<T, LoggerError>;

/// Errors raised by an [`EventBus`](crate::bus::EventBus) implementation
#[derive(Debug, Error)]
pub enum BusError {
    /// The host already tore the bus down
    #[error("event bus is closed")]
    Closed,

    /// Unsubscribe was called with a handle the bus does not know
    #[error("no {kind} handler registered with id {handle}")]
    UnknownHandler { kind: EventKind, handle: HandlerId },
}

/// Invalid configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A capacity setting was zero
    #[error("{field} must be at least 1")]
    ZeroCapacity { field: &'static str },

    /// Setting key is not part of the configuration surface
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    /// Setting value has the wrong JSON type
    #[error("setting '{key}' expects {expected}")]
    InvalidValue { key: String, expected: &'static str },
}

/// Failures of the settings persistence layer
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file root must be a JSON object")]
    NotAnObject,
}

/// Failures while binding handlers to the bus
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("failed to subscribe to {kind}: {source}")]
    Subscribe {
        kind: EventKind,
        #[source]
        source: BusError,
    },
}

/// Command surface errors
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command line")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),
}

/// Top-level error for the crate
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}
