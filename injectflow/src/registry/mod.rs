//! The registration catalog surface consumed by the resolve pipeline.
//!
//! This module defines:
//! - Service descriptors keying the catalog
//! - Registrations pairing a service with its pipeline and decorators
//! - The catalog lookup trait plus a concurrent in-memory implementation
//! - The activation contract invoked by the terminal pipeline stage

mod activator;
mod catalog;
mod descriptor;
mod registration;

pub use activator::{activator_fn, instance_fn, Activator, FnActivator};
pub use catalog::{ComponentRegistry, RegistrationCatalog};
pub use descriptor::ServiceDescriptor;
pub use registration::{decorator_fn, Decorator, FnDecorator, Registration};
