//! Diagnostic instrumentation for the resolve pipeline.
//!
//! The pipeline and operation publish named events through a
//! [`DiagnosticSource`]; listeners subscribe with per-event-name enablement
//! predicates and observe resolution without being able to alter its
//! outcome.

mod event;
mod listeners;
mod source;
mod trace;

pub use event::{events, DiagnosticEvent, DiagnosticPayload, Outcome};
pub use listeners::{CollectingListener, LoggingListener};
pub use source::{DiagnosticListener, DiagnosticSource, SubscriptionHandle};
pub use trace::{OperationTrace, OperationTraceBuilder, TraceNode};
