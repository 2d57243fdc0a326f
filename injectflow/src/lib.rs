//! # Injectflow
//!
//! A middleware-pipeline resolution engine for dependency injection.
//!
//! Injectflow turns a service request into an activated instance by running
//! it through the pipeline built for the service's registration:
//!
//! - **Resolve operations**: one top-level request plus everything it
//!   triggers, tracked as a unit for cycle detection and diagnostics
//! - **Stage chains**: ordered, immutable middleware built once per
//!   registration; stages may short-circuit, decorate, or activate
//! - **Diagnostic events**: every state transition published to subscribed
//!   listeners without ever altering resolution outcomes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use injectflow::prelude::*;
//!
//! // Describe how services are constructed
//! let registry = ComponentRegistry::new();
//! registry.register(Registration::new(
//!     ServiceDescriptor::of::<Database>(),
//!     PipelineBuilder::new(instance_fn(Database::connect)).shared().build(),
//! ));
//!
//! // Resolve the full graph
//! let resolver = Resolver::new(Arc::new(registry));
//! let database = resolver.resolve::<Database>()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod operation;
pub mod pipeline;
pub mod registry;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::{
        Instance, InstanceSlot, Parameters, RequestStatus, ResolveRequestContext,
    };
    pub use crate::diagnostics::{
        events, CollectingListener, DiagnosticEvent, DiagnosticListener, DiagnosticPayload,
        DiagnosticSource, LoggingListener, OperationTrace, OperationTraceBuilder, Outcome,
        SubscriptionHandle, TraceNode,
    };
    pub use crate::errors::{
        ActivationError, CircularDependencyError, ResolutionFailedError, ResolveError,
    };
    pub use crate::operation::{
        OperationStatus, ResolveOperation, ResolveRequest, Resolver,
    };
    pub use crate::pipeline::{
        ActivationStage, DecoratorStage, Next, PipelineBuilder, ResolvePipeline, ResolveStage,
        SharedInstanceStage,
    };
    pub use crate::registry::{
        activator_fn, decorator_fn, instance_fn, Activator, ComponentRegistry, Decorator,
        Registration, RegistrationCatalog, ServiceDescriptor,
    };
    pub use crate::utils::{iso_timestamp, Timestamp};
}

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        assert!(true);
    }
}
