//! Service descriptors keying the registration catalog.

use crate::utils::short_type_name;
use std::any::TypeId;
use std::fmt;

/// Identifies a resolvable service by its Rust type.
///
/// Descriptors are small `Copy` values used as catalog keys and carried in
/// diagnostic payloads. Two descriptors are equal iff they name the same
/// concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceDescriptor {
    /// Creates a descriptor for the service type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the fully-qualified name of the service type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type id of the service type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_type_name(self.type_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mailer;
    struct Scheduler;

    #[test]
    fn test_descriptor_equality() {
        assert_eq!(ServiceDescriptor::of::<Mailer>(), ServiceDescriptor::of::<Mailer>());
        assert_ne!(
            ServiceDescriptor::of::<Mailer>(),
            ServiceDescriptor::of::<Scheduler>()
        );
    }

    #[test]
    fn test_descriptor_display_uses_short_name() {
        let descriptor = ServiceDescriptor::of::<Mailer>();
        assert_eq!(descriptor.to_string(), "Mailer");
        assert!(descriptor.type_name().contains("::"));
    }

    #[test]
    fn test_descriptor_usable_as_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(ServiceDescriptor::of::<Mailer>(), 1);
        assert_eq!(map.get(&ServiceDescriptor::of::<Mailer>()), Some(&1));
        assert_eq!(map.get(&ServiceDescriptor::of::<Scheduler>()), None);
    }
}
