//! Built-in pipeline stages.

use super::{Next, ResolveStage};
use crate::context::{Instance, ResolveRequestContext};
use crate::errors::{ResolutionFailedError, ResolveError};
use crate::operation::ResolveOperation;
use crate::registry::{Activator, Decorator};
use parking_lot::RwLock;
use std::sync::Arc;

/// Short-circuits the chain with a cached instance once one exists.
///
/// The lock is never held across the continuation, so a registration whose
/// activation resolves further services cannot deadlock on its own cache.
/// Two operations racing an empty cache may both activate; the later write
/// wins.
#[derive(Default)]
pub struct SharedInstanceStage {
    cache: RwLock<Option<Instance>>,
}

impl SharedInstanceStage {
    /// Creates a stage with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an instance has been cached.
    #[must_use]
    pub fn has_cached(&self) -> bool {
        self.cache.read().is_some()
    }
}

impl ResolveStage for SharedInstanceStage {
    fn name(&self) -> &'static str {
        "shared-instance"
    }

    fn execute(
        &self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
        next: Next<'_>,
    ) -> Result<(), ResolveError> {
        let cached = self.cache.read().clone();
        if let Some(instance) = cached {
            ctx.fill_instance(instance)?;
            return Ok(());
        }

        next.invoke(op, ctx)?;

        if let Some(instance) = ctx.instance() {
            *self.cache.write() = Some(Arc::clone(instance));
        }
        Ok(())
    }
}

/// Applies the registration's decorator chain to the produced instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoratorStage;

impl ResolveStage for DecoratorStage {
    fn name(&self) -> &'static str {
        "decoration"
    }

    fn execute(
        &self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
        next: Next<'_>,
    ) -> Result<(), ResolveError> {
        next.invoke(op, ctx)?;

        if ctx.registration().decorators().is_empty() {
            return Ok(());
        }
        let decorators: Vec<Arc<dyn Decorator>> = ctx.registration().decorators().to_vec();

        let mut current = match ctx.instance() {
            Some(instance) => Arc::clone(instance),
            None => return Ok(()),
        };
        for decorator in &decorators {
            current = decorator.decorate(op, ctx, current)?;
        }
        ctx.replace_instance(current)?;
        Ok(())
    }
}

/// The terminal stage: materializes the instance through the registration's
/// activator.
///
/// Plain construction failures are wrapped into a resolution failure here;
/// errors raised by nested resolution inside the activator pass through
/// unchanged so the caller sees the original failure.
pub struct ActivationStage {
    activator: Arc<dyn Activator>,
}

impl ActivationStage {
    /// Creates the terminal stage around the given activator.
    #[must_use]
    pub fn new(activator: Arc<dyn Activator>) -> Self {
        Self { activator }
    }
}

impl ResolveStage for ActivationStage {
    fn name(&self) -> &'static str {
        "activation"
    }

    fn execute(
        &self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
        _next: Next<'_>,
    ) -> Result<(), ResolveError> {
        let instance = self.activator.activate(op, ctx).map_err(|err| match err {
            ResolveError::Activation(cause) => ResolveError::ResolutionFailed(
                ResolutionFailedError::new(
                    ctx.service().to_string(),
                    "activator failed to construct the instance",
                )
                .with_cause(cause),
            ),
            other => other,
        })?;
        ctx.fill_instance(instance)
    }
}
