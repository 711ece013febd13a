//! Subscription lifecycle
//!
//! Binds the engine's handlers to an [`EventBus`] and releases them again.
//! Every subscription made is recorded and unsubscribed exactly once.
//!
//! State machine:
//!
//! ```text
//! Unbound ──start()──► Bound ──stop()──► Unbound
//!    ▲ stop(): no-op      │ start(): no-op (AlreadyBound)
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::bus::{EventBus, Handler, HandlerId};
use crate::engine::MessageLogger;
use crate::error::SubscriptionError;
use crate::types::{BusEvent, EventKind};

/// One registration on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub kind: EventKind,
    pub handle: HandlerId,
}

/// Whether handlers are currently registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindState {
    #[default]
    Unbound,
    Bound,
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Handlers were registered for this many kinds
    Bound { subscriptions: usize },
    /// Already bound; nothing was registered
    AlreadyBound,
    /// No bus was available; the engine keeps serving commands with empty logs
    Detached,
}

/// Owns the set of live subscriptions
#[derive(Default)]
pub struct SubscriptionManager {
    state: BindState,
    bus: Option<Arc<dyn EventBus>>,
    subscriptions: Vec<Subscription>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == BindState::Bound
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Subscribe the enabled handler kinds
    ///
    /// `MESSAGE_CREATE` is always subscribed, since nothing can be correlated
    /// without cached snapshots. If any subscribe call fails, the ones already
    /// made are released and the manager stays unbound.
    pub fn start(
        &mut self,
        bus: Arc<dyn EventBus>,
        logger: &Arc<MessageLogger>,
    ) -> Result<StartOutcome, SubscriptionError> {
        if self.is_bound() {
            warn!("Start requested while already bound; ignoring");
            return Ok(StartOutcome::AlreadyBound);
        }

        let kinds = enabled_kinds(logger);
        let mut made = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match bus.subscribe(kind, guarded_handler(kind, logger)) {
                Ok(handle) => {
                    debug!(%kind, %handle, "Subscribed");
                    made.push(Subscription { kind, handle });
                }
                Err(source) => {
                    error!(%kind, error = %source, "Subscribe failed; rolling back");
                    release(bus.as_ref(), &made);
                    return Err(SubscriptionError::Subscribe { kind, source });
                }
            }
        }

        let count = made.len();
        self.subscriptions = made;
        self.bus = Some(bus);
        self.state = BindState::Bound;
        info!(subscriptions = count, "Subscribed to message events");
        Ok(StartOutcome::Bound {
            subscriptions: count,
        })
    }

    /// Unsubscribe everything recorded and return to unbound
    ///
    /// Individual unsubscribe failures are logged; the set is cleared
    /// regardless. Returns the number of handlers actually released.
    pub fn stop(&mut self) -> usize {
        if !self.is_bound() {
            debug!("Stop requested while unbound; nothing to release");
            return 0;
        }

        let subscriptions = std::mem::take(&mut self.subscriptions);
        let released = match self.bus.take() {
            Some(bus) => release(bus.as_ref(), &subscriptions),
            None => 0,
        };
        self.state = BindState::Unbound;
        info!(
            released,
            recorded = subscriptions.len(),
            "Unsubscribed from message events"
        );
        released
    }
}

fn enabled_kinds(logger: &MessageLogger) -> Vec<EventKind> {
    let config = logger.config();
    let mut kinds = vec![EventKind::MessageCreate];
    if config.log_deleted {
        kinds.push(EventKind::MessageDelete);
    }
    if config.log_edited {
        kinds.push(EventKind::MessageUpdate);
    }
    if config.log_bulk_deleted {
        kinds.push(EventKind::MessageDeleteBulk);
    }
    kinds
}

fn release(bus: &dyn EventBus, subscriptions: &[Subscription]) -> usize {
    let mut released = 0;
    for sub in subscriptions {
        match bus.unsubscribe(sub.kind, sub.handle) {
            Ok(()) => {
                debug!(kind = %sub.kind, handle = %sub.handle, "Unsubscribed");
                released += 1;
            }
            Err(e) => warn!(kind = %sub.kind, error = %e, "Unsubscribe failed"),
        }
    }
    released
}

/// Wrap the engine in a handler that never lets a failure escape
///
/// Events of another kind are ignored, and a panic inside the engine or one of
/// its collaborators is caught and logged with the event kind.
fn guarded_handler(kind: EventKind, logger: &Arc<MessageLogger>) -> Handler {
    let logger = Arc::clone(logger);
    Arc::new(move |event: &BusEvent| {
        if event.kind() != kind {
            return;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| logger.handle(event)));
        if let Err(payload) = outcome {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(%kind, reason = %reason, "Handler failed");
        }
    })
}
