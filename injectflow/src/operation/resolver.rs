//! The external entry point for resolving services.

use super::{ResolveOperation, ResolveRequest};
use crate::context::{Instance, Parameters};
use crate::diagnostics::DiagnosticSource;
use crate::errors::ResolveError;
use crate::registry::RegistrationCatalog;
use std::sync::Arc;

/// Resolves services from a catalog, one operation per call.
///
/// The resolver itself is cheap to clone around and safe to share between
/// threads; each `resolve` call creates a private [`ResolveOperation`], so
/// concurrent callers never share mutable resolution state.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<dyn RegistrationCatalog>,
    diagnostics: Arc<DiagnosticSource>,
}

impl Resolver {
    /// Creates a resolver over `catalog`, publishing diagnostics through the
    /// process-wide source.
    #[must_use]
    pub fn new(catalog: Arc<dyn RegistrationCatalog>) -> Self {
        Self {
            catalog,
            diagnostics: DiagnosticSource::global(),
        }
    }

    /// Replaces the diagnostic source, usually with a private one in tests.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticSource>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns the diagnostic source operations publish through.
    #[must_use]
    pub const fn diagnostics(&self) -> &Arc<DiagnosticSource> {
        &self.diagnostics
    }

    /// Starts a new resolve operation.
    #[must_use]
    pub fn begin_operation(&self) -> ResolveOperation {
        ResolveOperation::new(Arc::clone(&self.catalog), Arc::clone(&self.diagnostics))
    }

    /// Resolves the service type `T`.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveError> {
        self.begin_operation().resolve::<T>()
    }

    /// Resolves the service type `T` with caller-supplied parameters.
    pub fn resolve_with<T: Send + Sync + 'static>(
        &self,
        parameters: Parameters,
    ) -> Result<Arc<T>, ResolveError> {
        self.begin_operation().resolve_with::<T>(parameters)
    }

    /// Resolves an arbitrary request, returning the type-erased instance.
    pub fn resolve_service(&self, request: ResolveRequest) -> Result<Instance, ResolveError> {
        self.begin_operation().execute(request)
    }
}
