//! Building the immutable stage chain for a registration.

use super::stages::{ActivationStage, DecoratorStage, SharedInstanceStage};
use super::{ResolvePipeline, ResolveStage};
use crate::registry::Activator;
use std::sync::Arc;

/// Assembles the resolve pipeline for one registration.
///
/// Stages run in the order they are added; the builder always appends the
/// decoration stage and the terminal activation stage, so the activator is
/// the last link of every chain. Building is deterministic: the same inputs
/// always yield a chain with identical order and behavior.
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn ResolveStage>>,
    activator: Arc<dyn Activator>,
}

impl PipelineBuilder {
    /// Creates a builder around the registration's activator.
    #[must_use]
    pub fn new(activator: Arc<dyn Activator>) -> Self {
        Self {
            stages: Vec::new(),
            activator,
        }
    }

    /// Appends a stage to the chain.
    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn ResolveStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends a shared-instance stage, making the registration resolve to
    /// one cached instance after its first activation.
    #[must_use]
    pub fn shared(self) -> Self {
        self.with_stage(Arc::new(SharedInstanceStage::new()))
    }

    /// Freezes the chain into an immutable pipeline.
    #[must_use]
    pub fn build(self) -> ResolvePipeline {
        let mut stages = self.stages;
        stages.push(Arc::new(DecoratorStage));
        stages.push(Arc::new(ActivationStage::new(self.activator)));
        ResolvePipeline::from_stages(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::instance_fn;

    struct Clock;

    #[test]
    fn test_activation_is_always_terminal() {
        let pipeline = PipelineBuilder::new(instance_fn(|| Clock)).build();
        assert_eq!(pipeline.stage_names(), vec!["decoration", "activation"]);
    }

    #[test]
    fn test_shared_stage_runs_first() {
        let pipeline = PipelineBuilder::new(instance_fn(|| Clock)).shared().build();
        assert_eq!(
            pipeline.stage_names(),
            vec!["shared-instance", "decoration", "activation"]
        );
    }

    #[test]
    fn test_building_twice_yields_identical_chains() {
        let build = || PipelineBuilder::new(instance_fn(|| Clock)).shared().build();
        assert_eq!(build().stage_names(), build().stage_names());
    }
}
