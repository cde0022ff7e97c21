//! Type registry: maps a [`TypeId`] to a constructor for that actor type
//! (§6, §9). Registration happens once at startup; lookup happens on every
//! activation.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
use crate::activator::Actor;
use crate::util::TypeId;

/// Constructs a fresh actor instance for a type. Boxed as `Send + Sync`
/// because the registry is shared across every activation worker.
pub type ActorFactory = Arc<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

/// Error returned when a type id has no registered factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeError(pub TypeId);

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type: {}", self.0)
    }
}

impl std::error::Error for UnknownTypeError {}

/// Registry of actor-type constructors, keyed by [`TypeId`].
///
/// Backed by `DashMap` so registration and lookup never contend with each
/// other; registration is expected at startup, lookup on every activation.
#[derive(Default)]
pub struct TypeRegistry {
    factories: DashMap<TypeId, ActorFactory>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `type_id`. Overwrites any prior registration.
    pub fn register<F>(&self, type_id: TypeId, factory: F)
    where
        F: Fn() -> Box<dyn Actor> + Send + Sync + 'static,
    {
        self.factories.insert(type_id, Arc::new(factory));
    }

    /// Construct a fresh actor instance for `type_id` (§7 `UnknownType`).
    pub fn construct(&self, type_id: &TypeId) -> Result<Box<dyn Actor>, UnknownTypeError> {
        self.factories
            .get(type_id)
            .map(|factory| factory())
            .ok_or_else(|| UnknownTypeError(type_id.clone()))
    }

    /// Whether a constructor is registered for `type_id`.
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.factories.contains_key(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::{ActivationContext, ActorError};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Actor for Noop {
        async fn handle_call(
            &mut self,
            _method: &str,
            payload: Vec<u8>,
            _ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            Ok(payload)
        }
    }

    #[test]
    fn construct_unregistered_type_fails() {
        let registry = TypeRegistry::new();
        let err = registry.construct(&TypeId::new("Missing"));
        assert!(err.is_err());
    }

    #[test]
    fn register_then_construct_succeeds() {
        let registry = TypeRegistry::new();
        registry.register(TypeId::new("Noop"), || Box::new(Noop));
        assert!(registry.contains(&TypeId::new("Noop")));
        assert!(registry.construct(&TypeId::new("Noop")).is_ok());
    }
}
