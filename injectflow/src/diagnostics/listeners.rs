//! Ready-made diagnostic listeners.

use super::{DiagnosticEvent, DiagnosticListener, DiagnosticPayload};
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// A listener that renders every event through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingListener {
    level: Level,
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingListener {
    /// Creates a new logging listener with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging listener.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging listener.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl DiagnosticListener for LoggingListener {
    fn on_event(&self, event: &DiagnosticEvent) {
        match self.level {
            Level::DEBUG => {
                debug!(
                    event = event.name,
                    operation_id = %event.payload.operation_id,
                    service = %event.payload.request_descriptor,
                    stage = ?event.payload.stage_name,
                    outcome = ?event.payload.outcome,
                    "Resolve event: {}", event.name
                );
            }
            _ => {
                info!(
                    event = event.name,
                    operation_id = %event.payload.operation_id,
                    service = %event.payload.request_descriptor,
                    stage = ?event.payload.stage_name,
                    outcome = ?event.payload.outcome,
                    "Resolve event: {}", event.name
                );
            }
        }
    }
}

/// A listener that captures events for inspection, mainly in tests.
#[derive(Default)]
pub struct CollectingListener {
    events: RwLock<Vec<(&'static str, DiagnosticPayload)>>,
}

impl CollectingListener {
    /// Creates a new collecting listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<(&'static str, DiagnosticPayload)> {
        self.events.read().clone()
    }

    /// Returns just the captured event names, in delivery order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.read().iter().map(|(name, _)| *name).collect()
    }

    /// Returns captured events with the given name.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<DiagnosticPayload> {
        self.events
            .read()
            .iter()
            .filter(|(event_name, _)| *event_name == name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Returns the number of captured events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all captured events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl DiagnosticListener for CollectingListener {
    fn on_event(&self, event: &DiagnosticEvent) {
        self.events.write().push((event.name, event.payload.clone()));
    }
}
