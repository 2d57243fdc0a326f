//! Caller-supplied parameters for a resolve request.

use super::Instance;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable name-to-value map supplied by the caller of a resolve
/// request.
///
/// Parameters are assembled with the builder methods before the request
/// starts; the resolve pipeline only ever reads them.
#[derive(Default, Clone)]
pub struct Parameters {
    values: HashMap<String, Instance>,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a typed value under `name`.
    #[must_use]
    pub fn with_value<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        let instance: Instance = Arc::new(value);
        self.values.insert(name.into(), instance);
        self
    }

    /// Adds an already-erased instance under `name`.
    #[must_use]
    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.values.insert(name.into(), instance);
        self
    }

    /// Gets the value stored under `name`, downcast to `T`.
    ///
    /// Returns `None` if the name is absent or the stored value has a
    /// different concrete type.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.values
            .get(name)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Returns true if a value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the parameter names, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parameters() {
        let params = Parameters::new();
        assert!(params.is_empty());
        assert!(!params.contains("anything"));
    }

    #[test]
    fn test_typed_round_trip() {
        let params = Parameters::new()
            .with_value("connection_string", "server=localhost".to_string())
            .with_value("pool_size", 8usize);

        assert_eq!(params.len(), 2);
        assert_eq!(
            params.get::<String>("connection_string").as_deref(),
            Some(&"server=localhost".to_string())
        );
        assert_eq!(params.get::<usize>("pool_size").as_deref(), Some(&8));
    }

    #[test]
    fn test_wrong_type_returns_none() {
        let params = Parameters::new().with_value("pool_size", 8usize);
        assert!(params.get::<String>("pool_size").is_none());
    }

    #[test]
    fn test_missing_name_returns_none() {
        let params = Parameters::new();
        assert!(params.get::<usize>("pool_size").is_none());
    }
}
