//! Diagnostic event names and payload snapshots.

use crate::registry::ServiceDescriptor;
use crate::utils::iso_timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event names published by the resolve pipeline.
///
/// Listeners receive these exact strings in their enablement predicates, so
/// they form a stable contract alongside the payload shape.
pub mod events {
    /// A resolve operation began (first request pushed).
    pub const OPERATION_STARTED: &str = "operation.started";
    /// A resolve operation finished; the payload outcome says how.
    pub const OPERATION_COMPLETED: &str = "operation.completed";
    /// A resolve request was pushed onto the operation's stack.
    pub const REQUEST_STARTED: &str = "request.started";
    /// A resolve request was popped; the payload outcome says how.
    pub const REQUEST_COMPLETED: &str = "request.completed";
    /// A pipeline stage is about to execute.
    pub const STAGE_ENTERED: &str = "stage.entered";
    /// A pipeline stage returned; the payload outcome says how.
    pub const STAGE_EXITED: &str = "stage.exited";
}

/// How a request, stage, or operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The step completed and produced its result.
    Success,
    /// The step failed.
    Failure {
        /// The failure message, as rendered by the error type.
        message: String,
    },
}

impl Outcome {
    /// Returns true for a success outcome.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A read-only snapshot of operation and request state at emission time.
///
/// `stage_name` is present only on stage-boundary events; `outcome` only on
/// end events. Listeners must treat payloads as immutable.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticPayload {
    /// Correlates every event belonging to one resolve operation.
    pub operation_id: Uuid,
    /// Display form of the service being resolved when the event fired.
    pub request_descriptor: String,
    /// The pipeline stage, on stage-boundary events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    /// ISO 8601 emission time.
    pub timestamp: String,
    /// How the step ended, on end events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl DiagnosticPayload {
    /// Creates a payload snapshot for the given operation and service.
    #[must_use]
    pub fn new(operation_id: Uuid, service: ServiceDescriptor) -> Self {
        Self {
            operation_id,
            request_descriptor: service.to_string(),
            stage_name: None,
            timestamp: iso_timestamp(),
            outcome: None,
        }
    }

    /// Sets the stage name for a stage-boundary event.
    #[must_use]
    pub fn with_stage(mut self, stage_name: impl Into<String>) -> Self {
        self.stage_name = Some(stage_name.into());
        self
    }

    /// Sets the outcome for an end event.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

/// A named diagnostic event delivered to listeners.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// One of the names in [`events`].
    pub name: &'static str,
    /// The state snapshot taken when the event fired.
    pub payload: DiagnosticPayload,
}
