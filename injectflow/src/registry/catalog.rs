//! Catalog lookup interface and the in-memory registry.

use super::{Registration, ServiceDescriptor};
use dashmap::DashMap;
use std::sync::Arc;

/// Resolves a requested service descriptor to its registration.
///
/// This is the lookup surface the resolve operation consumes; richer catalog
/// features (conditional registrations, open generics, registration sources)
/// live behind implementations of this trait.
pub trait RegistrationCatalog: Send + Sync {
    /// Finds the registration for `service`, if one exists.
    fn find_registration(&self, service: &ServiceDescriptor) -> Option<Arc<Registration>>;
}

/// A concurrent in-memory registration catalog.
///
/// Safe for lookup from many resolving threads while registrations are
/// added; the usual pattern is to populate it fully before resolving.
#[derive(Default)]
pub struct ComponentRegistry {
    registrations: DashMap<ServiceDescriptor, Arc<Registration>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registration, replacing any previous one for the same service.
    ///
    /// Returns the shared handle now stored in the registry.
    pub fn register(&self, registration: Registration) -> Arc<Registration> {
        let registration = Arc::new(registration);
        self.registrations
            .insert(registration.service(), Arc::clone(&registration));
        registration
    }

    /// Returns true if a registration exists for `service`.
    #[must_use]
    pub fn contains(&self, service: &ServiceDescriptor) -> bool {
        self.registrations.contains_key(service)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if the registry holds no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl RegistrationCatalog for ComponentRegistry {
    fn find_registration(&self, service: &ServiceDescriptor) -> Option<Arc<Registration>> {
        self.registrations
            .get(service)
            .map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineBuilder;
    use crate::registry::instance_fn;

    struct Clock;

    fn clock_registration() -> Registration {
        Registration::new(
            ServiceDescriptor::of::<Clock>(),
            PipelineBuilder::new(instance_fn(|| Clock)).build(),
        )
    }

    #[test]
    fn test_register_and_find() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());

        let stored = registry.register(clock_registration());
        assert_eq!(registry.len(), 1);

        let found = registry
            .find_registration(&ServiceDescriptor::of::<Clock>())
            .unwrap();
        assert_eq!(found.id(), stored.id());
    }

    #[test]
    fn test_find_missing_service() {
        struct Unregistered;

        let registry = ComponentRegistry::new();
        registry.register(clock_registration());

        assert!(registry
            .find_registration(&ServiceDescriptor::of::<Unregistered>())
            .is_none());
    }

    #[test]
    fn test_register_replaces_previous() {
        let registry = ComponentRegistry::new();
        let first = registry.register(clock_registration());
        let second = registry.register(clock_registration());

        assert_eq!(registry.len(), 1);
        assert_ne!(first.id(), second.id());

        let found = registry
            .find_registration(&ServiceDescriptor::of::<Clock>())
            .unwrap();
        assert_eq!(found.id(), second.id());
    }
}
