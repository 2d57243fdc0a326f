//! Resolve operations: one top-level resolution and everything it triggers.

mod resolver;

pub use resolver::Resolver;


use crate::context::{Instance, Parameters, ResolveRequestContext};
use crate::diagnostics::{events, DiagnosticPayload, DiagnosticSource, Outcome};
use crate::errors::{CircularDependencyError, ResolutionFailedError, ResolveError};
use crate::registry::{RegistrationCatalog, ServiceDescriptor};
use std::sync::Arc;
use uuid::Uuid;

/// Completion status of a resolve operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// The operation is still resolving.
    InProgress,
    /// The root request completed and its instance was returned.
    Succeeded,
    /// The root request failed.
    Failed,
}

/// The input to one resolve request: which service, with what parameters.
#[derive(Clone)]
pub struct ResolveRequest {
    descriptor: ServiceDescriptor,
    parameters: Parameters,
}

impl ResolveRequest {
    /// Creates a request for the given service with no parameters.
    #[must_use]
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            parameters: Parameters::new(),
        }
    }

    /// Creates a request for the service type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(ServiceDescriptor::of::<T>())
    }

    /// Attaches caller-supplied parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Returns the requested service.
    #[must_use]
    pub const fn descriptor(&self) -> ServiceDescriptor {
        self.descriptor
    }

    /// Returns the attached parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn into_parts(self) -> (ServiceDescriptor, Parameters) {
        (self.descriptor, self.parameters)
    }
}

/// One in-flight request on the operation's stack.
struct RequestFrame {
    registration_id: Uuid,
    service: ServiceDescriptor,
}

/// One top-level resolution and all nested requests it triggers.
///
/// The operation owns the stack of in-flight requests, which gives it cycle
/// detection: a registration requested while already on the stack fails
/// immediately with the full cycle path, before any partial construction.
/// Every internal call that can recurse takes the operation as an explicit
/// `&mut` parameter; there is no ambient or thread-local current operation.
///
/// An operation is confined to the thread driving it; pipelines and
/// registrations are the shared, immutable pieces.
pub struct ResolveOperation {
    id: Uuid,
    catalog: Arc<dyn RegistrationCatalog>,
    diagnostics: Arc<DiagnosticSource>,
    stack: Vec<RequestFrame>,
    status: OperationStatus,
}

impl ResolveOperation {
    /// Creates a fresh operation over the given catalog and diagnostic
    /// source.
    #[must_use]
    pub fn new(catalog: Arc<dyn RegistrationCatalog>, diagnostics: Arc<DiagnosticSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            diagnostics,
            stack: Vec::new(),
            status: OperationStatus::InProgress,
        }
    }

    /// Returns the id correlating this operation's diagnostic events.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the completion status.
    #[must_use]
    pub const fn status(&self) -> OperationStatus {
        self.status
    }

    /// Returns the diagnostic source events are published through.
    #[must_use]
    pub const fn diagnostics(&self) -> &Arc<DiagnosticSource> {
        &self.diagnostics
    }

    /// Returns the number of requests currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the services currently on the stack, root first.
    #[must_use]
    pub fn stack_services(&self) -> Vec<ServiceDescriptor> {
        self.stack.iter().map(|frame| frame.service).collect()
    }

    /// Resolves one request, recursing through the registration's pipeline.
    ///
    /// Called externally for the root request and re-entered by activators
    /// and decorators for nested dependencies; every nested call pushes onto
    /// this operation's stack.
    pub fn execute(&mut self, request: ResolveRequest) -> Result<Instance, ResolveError> {
        let (descriptor, parameters) = request.into_parts();

        let Some(registration) = self.catalog.find_registration(&descriptor) else {
            let err = ResolutionFailedError::not_registered(descriptor.to_string());
            if self.stack.is_empty() {
                self.status = OperationStatus::Failed;
            }
            return Err(err.into());
        };

        // Fail fast on re-entrancy; the repeated request never starts.
        if self
            .stack
            .iter()
            .any(|frame| frame.registration_id == registration.id())
        {
            let mut path: Vec<String> = self
                .stack
                .iter()
                .map(|frame| frame.service.to_string())
                .collect();
            path.push(registration.service().to_string());
            return Err(CircularDependencyError::new(path).into());
        }

        let service = registration.service();
        if self.stack.is_empty() {
            self.publish(events::OPERATION_STARTED, service, None);
        }

        self.stack.push(RequestFrame {
            registration_id: registration.id(),
            service,
        });
        self.publish(events::REQUEST_STARTED, service, None);

        let mut ctx = ResolveRequestContext::new(self.id, Arc::clone(&registration), parameters);
        let invoked = registration.pipeline().invoke(self, &mut ctx);

        let outcome = invoked.and_then(|()| {
            ctx.instance().map(Arc::clone).ok_or_else(|| {
                ResolveError::from(ResolutionFailedError::new(
                    service.to_string(),
                    "resolve pipeline completed without producing an instance",
                ))
            })
        });

        self.stack.pop();

        match outcome {
            Ok(instance) => {
                ctx.mark_completed();
                self.publish(events::REQUEST_COMPLETED, service, Some(Outcome::Success));
                if self.stack.is_empty() {
                    self.status = OperationStatus::Succeeded;
                    self.publish(events::OPERATION_COMPLETED, service, Some(Outcome::Success));
                }
                Ok(instance)
            }
            Err(err) => {
                ctx.mark_failed();
                let failure = Outcome::Failure {
                    message: err.to_string(),
                };
                self.publish(events::REQUEST_COMPLETED, service, Some(failure.clone()));
                if self.stack.is_empty() {
                    self.status = OperationStatus::Failed;
                    self.publish(events::OPERATION_COMPLETED, service, Some(failure));
                }
                Err(err)
            }
        }
    }

    /// Resolves the service type `T` with no parameters.
    pub fn resolve<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ResolveError> {
        self.resolve_with(Parameters::new())
    }

    /// Resolves the service type `T` with caller-supplied parameters.
    pub fn resolve_with<T: Send + Sync + 'static>(
        &mut self,
        parameters: Parameters,
    ) -> Result<Arc<T>, ResolveError> {
        let descriptor = ServiceDescriptor::of::<T>();
        let instance = self.execute(ResolveRequest::new(descriptor).with_parameters(parameters))?;
        downcast_resolved(descriptor, instance)
    }

    fn publish(&self, name: &'static str, service: ServiceDescriptor, outcome: Option<Outcome>) {
        let id = self.id;
        self.diagnostics.publish(name, move || {
            let mut payload = DiagnosticPayload::new(id, service);
            payload.outcome = outcome;
            payload
        });
    }
}

/// Downcasts a resolved instance to the requested service type.
fn downcast_resolved<T: Send + Sync + 'static>(
    descriptor: ServiceDescriptor,
    instance: Instance,
) -> Result<Arc<T>, ResolveError> {
    instance.downcast::<T>().map_err(|_| {
        ResolutionFailedError::new(
            descriptor.to_string(),
            "resolved instance does not have the requested concrete type",
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineBuilder;
    use crate::registry::{activator_fn, instance_fn, ComponentRegistry, Registration};

    #[derive(Debug)]
    struct Config {
        url: String,
    }
    struct Repository {
        config: Arc<Config>,
    }

    fn operation(registry: ComponentRegistry) -> ResolveOperation {
        ResolveOperation::new(Arc::new(registry), Arc::new(DiagnosticSource::new()))
    }

    #[test]
    fn test_resolve_leaf_service() {
        let registry = ComponentRegistry::new();
        registry.register(Registration::new(
            ServiceDescriptor::of::<Config>(),
            PipelineBuilder::new(instance_fn(|| Config {
                url: "https://example.test".to_string(),
            }))
            .build(),
        ));

        let mut op = operation(registry);
        let config = op.resolve::<Config>().unwrap();

        assert_eq!(config.url, "https://example.test");
        assert_eq!(op.status(), OperationStatus::Succeeded);
        assert_eq!(op.depth(), 0);
    }

    #[test]
    fn test_nested_resolution_uses_same_stack() {
        let registry = ComponentRegistry::new();
        registry.register(Registration::new(
            ServiceDescriptor::of::<Config>(),
            PipelineBuilder::new(instance_fn(|| Config {
                url: "db://local".to_string(),
            }))
            .build(),
        ));
        registry.register(Registration::new(
            ServiceDescriptor::of::<Repository>(),
            PipelineBuilder::new(activator_fn(|op, _ctx| {
                let config = op.resolve::<Config>()?;
                let instance: Instance = Arc::new(Repository { config });
                Ok(instance)
            }))
            .build(),
        ));

        let mut op = operation(registry);
        let repository = op.resolve::<Repository>().unwrap();

        assert_eq!(repository.config.url, "db://local");
        assert_eq!(op.status(), OperationStatus::Succeeded);
    }

    #[test]
    fn test_unregistered_service_fails() {
        let mut op = operation(ComponentRegistry::new());
        let err = op.resolve::<Config>().unwrap_err();

        assert!(err.is_resolution_failed());
        assert_eq!(op.status(), OperationStatus::Failed);
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let registry: Arc<dyn RegistrationCatalog> = Arc::new(ComponentRegistry::new());
        let diagnostics = Arc::new(DiagnosticSource::new());
        let a = ResolveOperation::new(Arc::clone(&registry), Arc::clone(&diagnostics));
        let b = ResolveOperation::new(registry, diagnostics);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_activation_error_is_wrapped() {
        use crate::errors::ActivationError;

        let registry = ComponentRegistry::new();
        registry.register(Registration::new(
            ServiceDescriptor::of::<Config>(),
            PipelineBuilder::new(activator_fn(|_op, ctx| {
                Err(ActivationError::new(ctx.service().to_string(), "missing url").into())
            }))
            .build(),
        ));

        let mut op = operation(registry);
        let err = op.resolve::<Config>().unwrap_err();

        match err {
            ResolveError::ResolutionFailed(inner) => {
                assert!(inner.cause.is_some());
            }
            other => panic!("expected ResolutionFailed, got {other}"),
        }
        assert_eq!(op.status(), OperationStatus::Failed);
    }
}
