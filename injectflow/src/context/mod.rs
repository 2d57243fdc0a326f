//! Request-scoped state threaded through the resolve pipeline.

mod parameters;
mod request;

pub use parameters::Parameters;
pub use request::{InstanceSlot, RequestStatus, ResolveRequestContext};

use std::any::Any;
use std::sync::Arc;

/// A type-erased, shareable service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;
