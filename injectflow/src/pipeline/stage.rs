//! The stage capability and the continuation that drives the chain.

use crate::context::ResolveRequestContext;
use crate::diagnostics::{events, DiagnosticPayload, DiagnosticSource, Outcome};
use crate::errors::ResolveError;
use crate::operation::ResolveOperation;
use std::sync::Arc;

/// One link in a registration's resolve pipeline.
///
/// A stage may fill the context's instance slot itself (short-circuiting the
/// rest of the chain), fail, or call `next` and optionally post-process the
/// result. Stages hold no per-request state; one stage object serves every
/// request for its registration, concurrently, without locking.
pub trait ResolveStage: Send + Sync {
    /// Stable name used in stage-boundary diagnostic events.
    fn name(&self) -> &'static str;

    /// Executes this stage for one request.
    fn execute(
        &self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
        next: Next<'_>,
    ) -> Result<(), ResolveError>;
}

/// The remainder of the chain after the current stage.
///
/// Not calling [`Next::invoke`] is how a stage short-circuits; the skipped
/// stages simply never run.
pub struct Next<'a> {
    stages: &'a [Arc<dyn ResolveStage>],
    diagnostics: &'a DiagnosticSource,
}

impl<'a> Next<'a> {
    pub(crate) const fn new(
        stages: &'a [Arc<dyn ResolveStage>],
        diagnostics: &'a DiagnosticSource,
    ) -> Self {
        Self { stages, diagnostics }
    }

    /// Runs the rest of the chain.
    ///
    /// Stage-boundary events are published around each stage only when some
    /// listener is enabled for them, so an unobserved resolution pays only
    /// the enablement check.
    pub fn invoke(
        self,
        op: &mut ResolveOperation,
        ctx: &mut ResolveRequestContext,
    ) -> Result<(), ResolveError> {
        let Some((stage, rest)) = self.stages.split_first() else {
            return Ok(());
        };

        let boundary_events = self.diagnostics.any_enabled(events::STAGE_ENTERED)
            || self.diagnostics.any_enabled(events::STAGE_EXITED);
        if boundary_events {
            self.diagnostics.publish(events::STAGE_ENTERED, || {
                DiagnosticPayload::new(op.id(), ctx.service()).with_stage(stage.name())
            });
        }

        let result = stage.execute(op, ctx, Self::new(rest, self.diagnostics));

        if boundary_events {
            let outcome = match &result {
                Ok(()) => Outcome::Success,
                Err(err) => Outcome::Failure {
                    message: err.to_string(),
                },
            };
            self.diagnostics.publish(events::STAGE_EXITED, || {
                DiagnosticPayload::new(op.id(), ctx.service())
                    .with_stage(stage.name())
                    .with_outcome(outcome)
            });
        }

        result
    }
}
