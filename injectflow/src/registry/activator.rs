//! The activation contract consumed by the terminal pipeline stage.

use crate::context::{Instance, ResolveRequestContext};
use crate::errors::ResolveError;
use crate::operation::ResolveOperation;
use std::sync::Arc;

/// Construction strategy for a registration.
///
/// Activators materialize an instance from the request's parameters,
/// recursively resolving constructor dependencies through the supplied
/// operation so nested requests land on the same stack. Plain construction
/// failures should be reported as [`crate::errors::ActivationError`]; errors
/// raised by nested resolution must be returned unchanged so the caller sees
/// the original failure.
pub trait Activator: Send + Sync {
    /// Constructs an instance for the request described by `ctx`.
    fn activate(
        &self,
        op: &mut ResolveOperation,
        ctx: &ResolveRequestContext,
    ) -> Result<Instance, ResolveError>;
}

/// An activator backed by a plain function or closure.
pub struct FnActivator<F>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext) -> Result<Instance, ResolveError>
        + Send
        + Sync,
{
    func: F,
}

impl<F> Activator for FnActivator<F>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext) -> Result<Instance, ResolveError>
        + Send
        + Sync,
{
    fn activate(
        &self,
        op: &mut ResolveOperation,
        ctx: &ResolveRequestContext,
    ) -> Result<Instance, ResolveError> {
        (self.func)(op, ctx)
    }
}

/// Wraps a closure as an [`Activator`].
pub fn activator_fn<F>(func: F) -> Arc<dyn Activator>
where
    F: Fn(&mut ResolveOperation, &ResolveRequestContext) -> Result<Instance, ResolveError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnActivator { func })
}

/// Wraps a closure producing a plain value as an [`Activator`].
///
/// Convenience for registrations whose construction needs neither parameters
/// nor nested resolution.
pub fn instance_fn<T, F>(func: F) -> Arc<dyn Activator>
where
    T: Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    activator_fn(move |_op, _ctx| {
        let instance: Instance = Arc::new(func());
        Ok(instance)
    })
}
