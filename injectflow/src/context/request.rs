//! The per-request context threaded through the resolve pipeline.

use super::{Instance, Parameters};
use crate::errors::{ResolutionFailedError, ResolveError};
use crate::registry::{Registration, ServiceDescriptor};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Execution status of a single resolve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// The request exists but its pipeline has not started.
    NotStarted,
    /// The pipeline is currently executing.
    Executing,
    /// The pipeline produced an instance.
    Completed,
    /// The pipeline failed.
    Failed,
}

/// The write-once holder for a request's produced instance.
///
/// The `Empty` to `Filled` transition happens at most once, enforced at the
/// single assignment site in [`ResolveRequestContext::fill_instance`].
/// Replacing the value of an already-filled slot (decoration) is a distinct
/// transition that requires `Filled`.
#[derive(Default, Clone)]
pub enum InstanceSlot {
    /// No instance has been produced yet.
    #[default]
    Empty,
    /// The produced instance.
    Filled(Instance),
}

impl fmt::Debug for InstanceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Filled(_) => f.write_str("Filled"),
        }
    }
}

/// A single service-resolution step within a resolve operation.
///
/// The context owns everything mutable about one request: the instance slot
/// and the status. The target registration and caller parameters are fixed
/// when the request is created. Contexts are confined to the thread running
/// the operation and discarded once the result folds into the parent.
pub struct ResolveRequestContext {
    operation_id: Uuid,
    registration: Arc<Registration>,
    parameters: Parameters,
    slot: InstanceSlot,
    status: RequestStatus,
}

impl ResolveRequestContext {
    /// Creates a context for resolving `registration` within the operation
    /// identified by `operation_id`.
    #[must_use]
    pub fn new(operation_id: Uuid, registration: Arc<Registration>, parameters: Parameters) -> Self {
        Self {
            operation_id,
            registration,
            parameters,
            slot: InstanceSlot::Empty,
            status: RequestStatus::NotStarted,
        }
    }

    /// Returns the id of the owning operation.
    #[must_use]
    pub const fn operation_id(&self) -> Uuid {
        self.operation_id
    }

    /// Returns the registration being resolved.
    #[must_use]
    pub const fn registration(&self) -> &Arc<Registration> {
        &self.registration
    }

    /// Returns the service descriptor of the target registration.
    #[must_use]
    pub fn service(&self) -> ServiceDescriptor {
        self.registration.service()
    }

    /// Returns the caller-supplied parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Marks the pipeline as started.
    ///
    /// Re-entering a request whose pipeline already ran is forbidden.
    pub fn begin(&mut self) -> Result<(), ResolveError> {
        if self.status != RequestStatus::NotStarted {
            return Err(ResolutionFailedError::new(
                self.service().to_string(),
                "request pipeline was re-entered after it already ran",
            )
            .into());
        }
        self.status = RequestStatus::Executing;
        Ok(())
    }

    /// Fills the instance slot.
    ///
    /// This is the only place the `Empty` to `Filled` transition happens; a
    /// second fill is an invariant violation reported as a resolution
    /// failure.
    pub fn fill_instance(&mut self, instance: Instance) -> Result<(), ResolveError> {
        if matches!(self.slot, InstanceSlot::Filled(_)) {
            return Err(ResolutionFailedError::new(
                self.service().to_string(),
                "instance slot was filled twice for one request",
            )
            .into());
        }
        self.slot = InstanceSlot::Filled(instance);
        Ok(())
    }

    /// Replaces the instance in an already-filled slot, returning the
    /// previous value.
    ///
    /// Used by decoration, which wraps a produced instance rather than
    /// producing one.
    pub fn replace_instance(&mut self, instance: Instance) -> Result<Instance, ResolveError> {
        match std::mem::take(&mut self.slot) {
            InstanceSlot::Filled(previous) => {
                self.slot = InstanceSlot::Filled(instance);
                Ok(previous)
            }
            InstanceSlot::Empty => Err(ResolutionFailedError::new(
                self.service().to_string(),
                "attempted to decorate before an instance was produced",
            )
            .into()),
        }
    }

    /// Returns the produced instance, if the slot has been filled.
    #[must_use]
    pub const fn instance(&self) -> Option<&Instance> {
        match &self.slot {
            InstanceSlot::Filled(instance) => Some(instance),
            InstanceSlot::Empty => None,
        }
    }

    /// Returns true if the slot has been filled.
    #[must_use]
    pub const fn has_instance(&self) -> bool {
        matches!(self.slot, InstanceSlot::Filled(_))
    }

    /// Marks the request as completed.
    pub fn mark_completed(&mut self) {
        self.status = RequestStatus::Completed;
    }

    /// Marks the request as failed.
    pub fn mark_failed(&mut self) {
        self.status = RequestStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineBuilder;
    use crate::registry::instance_fn;

    struct Widget(u32);

    fn widget_context() -> ResolveRequestContext {
        let registration = Registration::new(
            ServiceDescriptor::of::<Widget>(),
            PipelineBuilder::new(instance_fn(|| Widget(7))).build(),
        );
        ResolveRequestContext::new(Uuid::new_v4(), Arc::new(registration), Parameters::new())
    }

    #[test]
    fn test_initial_state() {
        let ctx = widget_context();
        assert_eq!(ctx.status(), RequestStatus::NotStarted);
        assert!(!ctx.has_instance());
        assert!(ctx.instance().is_none());
    }

    #[test]
    fn test_begin_transitions_to_executing() {
        let mut ctx = widget_context();
        ctx.begin().unwrap();
        assert_eq!(ctx.status(), RequestStatus::Executing);
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut ctx = widget_context();
        ctx.begin().unwrap();
        let err = ctx.begin().unwrap_err();
        assert!(err.is_resolution_failed());
    }

    #[test]
    fn test_fill_is_write_once() {
        let mut ctx = widget_context();
        ctx.fill_instance(Arc::new(Widget(1))).unwrap();
        assert!(ctx.has_instance());

        let err = ctx
            .fill_instance(Arc::new(Widget(2)))
            .unwrap_err();
        assert!(err.is_resolution_failed());
    }

    #[test]
    fn test_replace_requires_filled_slot() {
        let mut ctx = widget_context();
        let err = ctx
            .replace_instance(Arc::new(Widget(1)))
            .unwrap_err();
        assert!(err.is_resolution_failed());

        ctx.fill_instance(Arc::new(Widget(1))).unwrap();
        let previous = ctx.replace_instance(Arc::new(Widget(2))).unwrap();
        let previous = previous.downcast::<Widget>().map_err(|_| ()).unwrap();
        assert_eq!(previous.0, 1);

        let current = Arc::clone(ctx.instance().unwrap())
            .downcast::<Widget>()
            .map_err(|_| ())
            .unwrap();
        assert_eq!(current.0, 2);
    }
}
