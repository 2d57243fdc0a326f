//! Component registrations and decoration.

use super::ServiceDescriptor;
use crate::context::{Instance, ResolveRequestContext};
use crate::errors::ResolveError;
use crate::operation::ResolveOperation;
use crate::pipeline::ResolvePipeline;
use std::sync::Arc;
use uuid::Uuid;

/// Wraps a produced instance, usually to layer behavior over it.
///
/// Decorators run after activation, in registration order, so the first
/// decorator added wraps the raw instance and the last one produces the
/// instance the caller receives. A decorator may resolve additional services
/// through the operation; those requests join the current stack and are
/// subject to the same cycle detection.
pub trait Decorator: Send + Sync {
    /// Wraps `inner`, returning the instance to use in its place.
    fn decorate(
        &self,
        op: &mut ResolveOperation,
        ctx: &ResolveRequestContext,
        inner: Instance,
    ) -> Result<Instance, ResolveError>;
}

/// A decorator backed by a plain function or closure.
pub struct FnDecorator<F>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext, Instance) -> Result<Instance, ResolveError>
        + Send
        + Sync,
{
    func: F,
}

impl<F> Decorator for FnDecorator<F>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext, Instance) -> Result<Instance, ResolveError>
        + Send
        + Sync,
{
    fn decorate(
        &self,
        op: &mut ResolveOperation,
        ctx: &ResolveRequestContext,
        inner: Instance,
    ) -> Result<Instance, ResolveError> {
        (self.func)(op, ctx, inner)
    }
}

/// Wraps a closure as a [`Decorator`].
pub fn decorator_fn<F>(func: F) -> Arc<dyn Decorator>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext, Instance) -> Result<Instance, ResolveError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnDecorator { func })
}

/// A catalog entry describing how one service is constructed.
///
/// Registrations are immutable once built and shared across every operation
/// that resolves the service; the pipeline chain is constructed exactly once
/// here and reused without per-call allocation.
pub struct Registration {
    id: Uuid,
    service: ServiceDescriptor,
    pipeline: ResolvePipeline,
    decorators: Vec<Arc<dyn Decorator>>,
}

impl Registration {
    /// Creates a registration for `service` resolved through `pipeline`.
    #[must_use]
    pub fn new(service: ServiceDescriptor, pipeline: ResolvePipeline) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            pipeline,
            decorators: Vec::new(),
        }
    }

    /// Appends a decorator to the chain applied to produced instances.
    #[must_use]
    pub fn with_decorator(mut self, decorator: Arc<dyn Decorator>) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Returns the unique id of this registration.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the service this registration provides.
    #[must_use]
    pub const fn service(&self) -> ServiceDescriptor {
        self.service
    }

    /// Returns the resolve pipeline for this registration.
    #[must_use]
    pub const fn pipeline(&self) -> &ResolvePipeline {
        &self.pipeline
    }

    /// Returns the decorator chain, in application order.
    #[must_use]
    pub fn decorators(&self) -> &[Arc<dyn Decorator>] {
        &self.decorators
    }
}
