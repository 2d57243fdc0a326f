//! Error types for the resolve pipeline.
//!
//! The taxonomy is small by design: a resolution either trips the
//! circular-dependency guard, or it fails somewhere in the pipeline and is
//! reported as a [`ResolutionFailedError`] wrapping the originating cause.
//! Activation failures surface from the external activator as
//! [`ActivationError`] and are wrapped before crossing the pipeline boundary.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for resolve operations.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// A registration was re-requested while still on the operation's stack.
    #[error("{0}")]
    CircularDependency(#[from] CircularDependencyError),

    /// A registration was missing, or a stage or activation failed.
    #[error("{0}")]
    ResolutionFailed(#[from] ResolutionFailedError),

    /// A construction-time failure from the activator.
    ///
    /// This variant only exists between the activator and the terminal
    /// pipeline stage; the stage wraps it into
    /// [`ResolveError::ResolutionFailed`] before it reaches a caller.
    #[error("{0}")]
    Activation(#[from] ActivationError),
}

impl ResolveError {
    /// Returns true if this is a circular-dependency failure.
    #[must_use]
    pub const fn is_circular_dependency(&self) -> bool {
        matches!(self, Self::CircularDependency(_))
    }

    /// Returns true if this is a resolution failure.
    #[must_use]
    pub const fn is_resolution_failed(&self) -> bool {
        matches!(self, Self::ResolutionFailed(_))
    }

    /// Converts to a dictionary representation for structured logging.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::CircularDependency(err) => {
                map.insert("type".to_string(), serde_json::json!("CircularDependency"));
                map.insert("cycle_path".to_string(), serde_json::json!(err.cycle_path));
            }
            Self::ResolutionFailed(err) => {
                map.insert("type".to_string(), serde_json::json!("ResolutionFailed"));
                map.insert("service".to_string(), serde_json::json!(err.service));
                if let Some(ref cause) = err.cause {
                    map.insert("cause".to_string(), serde_json::json!(cause.to_string()));
                }
            }
            Self::Activation(err) => {
                map.insert("type".to_string(), serde_json::json!("Activation"));
                map.insert("service".to_string(), serde_json::json!(err.service));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a registration is requested while already being resolved
/// on the same operation's stack.
#[derive(Debug, Clone, Error)]
#[error("Circular dependency detected: {}", cycle_path.join(" -> "))]
pub struct CircularDependencyError {
    /// The services forming the cycle, from the root request to the repeated one.
    pub cycle_path: Vec<String>,
}

impl CircularDependencyError {
    /// Creates a new circular dependency error.
    #[must_use]
    pub const fn new(cycle_path: Vec<String>) -> Self {
        Self { cycle_path }
    }
}

/// Error raised when a resolve request cannot be completed.
#[derive(Debug, Clone, Error)]
#[error("Resolution failed for service '{service}': {message}")]
pub struct ResolutionFailedError {
    /// The service that failed to resolve.
    pub service: String,
    /// What went wrong.
    pub message: String,
    /// The originating activation failure, if any.
    #[source]
    pub cause: Option<ActivationError>,
}

impl ResolutionFailedError {
    /// Creates a new resolution failure.
    #[must_use]
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a failure for a service with no matching registration.
    #[must_use]
    pub fn not_registered(service: impl Into<String>) -> Self {
        Self::new(service, "no registration found for the requested service")
    }

    /// Attaches the originating activation failure.
    #[must_use]
    pub fn with_cause(mut self, cause: ActivationError) -> Self {
        self.cause = Some(cause);
        self
    }
}

/// Error raised by an activator when instance construction fails.
#[derive(Debug, Clone, Error)]
#[error("Activation failed for service '{service}': {reason}")]
pub struct ActivationError {
    /// The service being activated.
    pub service: String,
    /// The reason construction failed.
    pub reason: String,
}

impl ActivationError {
    /// Creates a new activation error.
    #[must_use]
    pub fn new(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_dependency_display() {
        let err = CircularDependencyError::new(vec![
            "A".to_string(),
            "B".to_string(),
            "A".to_string(),
        ]);
        assert!(err.to_string().contains("A -> B -> A"));
    }

    #[test]
    fn test_resolution_failed_with_cause() {
        let cause = ActivationError::new("Database", "connection string missing");
        let err = ResolutionFailedError::new("Database", "activator failed").with_cause(cause);

        assert_eq!(err.service, "Database");
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }

    #[test]
    fn test_not_registered_message() {
        let err = ResolutionFailedError::not_registered("Mailer");
        assert!(err.to_string().contains("Mailer"));
        assert!(err.to_string().contains("no registration"));
    }

    #[test]
    fn test_resolve_error_predicates() {
        let cycle: ResolveError =
            CircularDependencyError::new(vec!["A".to_string(), "A".to_string()]).into();
        assert!(cycle.is_circular_dependency());
        assert!(!cycle.is_resolution_failed());

        let failed: ResolveError = ResolutionFailedError::not_registered("A").into();
        assert!(failed.is_resolution_failed());
    }

    #[test]
    fn test_to_dict() {
        let err: ResolveError = CircularDependencyError::new(vec![
            "A".to_string(),
            "B".to_string(),
            "A".to_string(),
        ])
        .into();

        let dict = err.to_dict();
        assert_eq!(dict.get("type").unwrap(), "CircularDependency");
        assert_eq!(
            dict.get("cycle_path").unwrap(),
            &serde_json::json!(["A", "B", "A"])
        );
    }
}
