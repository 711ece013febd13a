//! Event bus seam
//!
//! The host's dispatcher is an external collaborator. [`EventBus`] is the
//! subscribe/unsubscribe contract the logger needs from it, and [`LocalBus`]
//! is an in-process implementation used by the host driver and the tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::BusError;
use crate::types::{BusEvent, EventKind};

/// Callback invoked for every notification of the subscribed kind
pub type Handler = Arc<dyn Fn(&BusEvent) + Send + Sync>;

/// Opaque handle identifying one registration on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscribe/unsubscribe contract of the host dispatcher
pub trait EventBus: Send + Sync {
    fn subscribe(&self, kind: EventKind, handler: Handler) -> Result<HandlerId, BusError>;

    fn unsubscribe(&self, kind: EventKind, handle: HandlerId) -> Result<(), BusError>;
}

/// In-process dispatcher
#[derive(Default)]
pub struct LocalBus {
    next_id: AtomicU64,
    closed: AtomicBool,
    handlers: RwLock<HashMap<EventKind, Vec<(HandlerId, Handler)>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every handler of its kind, returning how many ran
    ///
    /// Handlers are called outside the registry lock so they may unsubscribe.
    pub fn dispatch(&self, event: &BusEvent) -> usize {
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Decode a raw payload and dispatch it; payloads that do not apply are dropped
    pub fn dispatch_value(&self, value: &Value) -> usize {
        match BusEvent::from_value(value) {
            Some(event) => self.dispatch(&event),
            None => {
                debug!("Dropped notification that does not apply");
                0
            }
        }
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.read().get(&kind).map_or(0, Vec::len)
    }

    pub fn total_handlers(&self) -> usize {
        self.handlers.read().values().map(Vec::len).sum()
    }

    /// Simulate the host tearing the bus down: all later calls fail
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.handlers.write().clear();
    }

    fn ensure_open(&self) -> Result<(), BusError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(BusError::Closed)
        } else {
            Ok(())
        }
    }
}

impl EventBus for LocalBus {
    fn subscribe(&self, kind: EventKind, handler: Handler) -> Result<HandlerId, BusError> {
        self.ensure_open()?;
        let handle = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handlers
            .write()
            .entry(kind)
            .or_default()
            .push((handle, handler));
        Ok(handle)
    }

    fn unsubscribe(&self, kind: EventKind, handle: HandlerId) -> Result<(), BusError> {
        self.ensure_open()?;
        let mut handlers = self.handlers.write();
        let list = handlers
            .get_mut(&kind)
            .ok_or(BusError::UnknownHandler { kind, handle })?;
        let before = list.len();
        list.retain(|(id, _)| *id != handle);
        if list.len() == before {
            return Err(BusError::UnknownHandler { kind, handle });
        }
        Ok(())
    }
}
