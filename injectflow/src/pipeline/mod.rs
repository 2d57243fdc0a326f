//! The middleware chain that turns a resolve request into an instance.
//!
//! A pipeline is built once per registration and shared, immutably, across
//! every request and thread that resolves the registration. All mutable
//! state lives in the request context passed through the chain.

mod builder;
mod stage;
mod stages;

pub use builder::PipelineBuilder;
pub use stage::{Next, ResolveStage};
pub use stages::{ActivationStage, DecoratorStage, SharedInstanceStage};

use crate::context::ResolveRequestContext;
use crate::errors::ResolveError;
use crate::operation::ResolveOperation;
use std::sync::Arc;

/// An ordered, immutable chain of stages for one registration.
#[derive(Clone)]
pub struct ResolvePipeline {
    stages: Arc<[Arc<dyn ResolveStage>]>,
}

impl ResolvePipeline {
    pub(crate) fn from_stages(stages: Vec<Arc<dyn ResolveStage>>) -> Self {
        Self {
            stages: stages.into(),
        }
    }

    /// Returns the number of stages in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Executes the chain for one request, populating the context's
    /// instance slot or propagating the first stage failure.
    pub fn invoke(
        &self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
    ) -> Result<(), ResolveError> {
        ctx.begin()?;
        let diagnostics = Arc::clone(op.diagnostics());
        Next::new(&self.stages, &diagnostics).invoke(op, ctx)
    }
}
