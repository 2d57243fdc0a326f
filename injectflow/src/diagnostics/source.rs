//! The publish point connecting the resolve pipeline to its listeners.

use super::{DiagnosticEvent, DiagnosticPayload};
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Receives diagnostic events published during resolution.
///
/// Implementations must not assume events arrive on any particular thread;
/// delivery happens synchronously on whichever thread is resolving. A
/// listener that panics is logged and skipped; it can never change the
/// outcome of the resolution that emitted the event.
pub trait DiagnosticListener: Send + Sync {
    /// Handles one published event.
    fn on_event(&self, event: &DiagnosticEvent);
}

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

#[derive(Clone)]
struct Subscription {
    handle: u64,
    listener: Arc<dyn DiagnosticListener>,
    is_enabled: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

/// A registry of (listener, enablement predicate) pairs with synchronous,
/// subscription-ordered delivery.
///
/// The subscription list is copy-on-write: publishing clones an `Arc` of the
/// current list and iterates it without holding the lock, so publishes from
/// many resolving threads never contend with each other. Consequently, an
/// unsubscribe that races an in-flight publish may still see that publish
/// delivered to the removed listener; subsequent publishes will not.
#[derive(Default)]
pub struct DiagnosticSource {
    subscriptions: RwLock<Arc<Vec<Subscription>>>,
    next_handle: AtomicU64,
}

impl DiagnosticSource {
    /// Creates a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide source used when none is supplied
    /// explicitly.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<DiagnosticSource>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Subscribes a listener gated by an enablement predicate.
    ///
    /// The predicate is evaluated per event name before any payload is
    /// built, so a disabled listener costs nothing beyond the predicate
    /// call.
    pub fn subscribe(
        &self,
        listener: Arc<dyn DiagnosticListener>,
        is_enabled: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.subscriptions.write();
        let mut next: Vec<Subscription> = guard.as_ref().clone();
        next.push(Subscription {
            handle,
            listener,
            is_enabled: Arc::new(is_enabled),
        });
        *guard = Arc::new(next);
        SubscriptionHandle(handle)
    }

    /// Subscribes a listener to every event.
    pub fn subscribe_all(&self, listener: Arc<dyn DiagnosticListener>) -> SubscriptionHandle {
        self.subscribe(listener, |_| true)
    }

    /// Removes a subscription.
    ///
    /// Returns false if the handle was already removed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut guard = self.subscriptions.write();
        let before = guard.len();
        let next: Vec<Subscription> = guard
            .as_ref()
            .iter()
            .filter(|sub| sub.handle != handle.0)
            .cloned()
            .collect();
        let removed = next.len() != before;
        *guard = Arc::new(next);
        removed
    }

    /// Returns true if any subscription exists.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        !self.subscriptions.read().is_empty()
    }

    /// Returns true if at least one subscribed listener is enabled for
    /// `name`.
    ///
    /// Callers use this to skip work (payload assembly, extra events) when
    /// nothing is observing.
    #[must_use]
    pub fn any_enabled(&self, name: &str) -> bool {
        let subscriptions = Arc::clone(&self.subscriptions.read());
        subscriptions.iter().any(|sub| (sub.is_enabled)(name))
    }

    /// Publishes an event to every enabled listener, in subscription order.
    ///
    /// The payload factory runs at most once, and only when some listener is
    /// enabled for `name`. Listener panics are caught and logged without
    /// interrupting delivery to the remaining listeners.
    pub fn publish<F>(&self, name: &'static str, payload: F)
    where
        F: FnOnce() -> DiagnosticPayload,
    {
        let subscriptions = Arc::clone(&self.subscriptions.read());
        if subscriptions.is_empty() {
            return;
        }

        let enabled: Vec<&Subscription> = subscriptions
            .iter()
            .filter(|sub| (sub.is_enabled)(name))
            .collect();
        if enabled.is_empty() {
            return;
        }

        let event = DiagnosticEvent {
            name,
            payload: payload(),
        };
        for subscription in enabled {
            let listener = &subscription.listener;
            if catch_unwind(AssertUnwindSafe(|| listener.on_event(&event))).is_err() {
                warn!(event = name, "diagnostic listener panicked; continuing delivery");
            }
        }
    }
}
