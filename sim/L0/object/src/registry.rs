//! Runtime type registry: type name to prototype.
//!
//! Deserialization resolves an element tag to a concrete type by cloning the
//! prototype registered under that name. Registration is explicit and has a
//! two-phase lifecycle:
//!
//! 1. **Registration**: every concrete type is registered once during startup.
//! 2. **Lookup**: after [`TypeRegistry::freeze`] (or [`freeze_registry`] for the
//!    process-wide instance) the registry is read-only; further registration
//!    fails with [`ObjectError::RegistryFrozen`].
//!
//! A [`TypeRegistry`] value can be owned directly; the process-wide instance
//! behind [`global_registry`] exists for callers that load models from many
//! places and want one shared set of registrations.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::error::{ObjectError, Result};
use crate::object::Object;

/// Mapping from type name to prototype instance.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    prototypes: HashMap<String, Box<dyn Object>>,
    frozen: bool,
}

impl TypeRegistry {
    /// Create an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `prototype` under `name`.
    ///
    /// `name` normally equals the prototype's type name; a different name
    /// registers an alias that produces instances of the prototype's type.
    pub fn register_type(
        &mut self,
        name: impl Into<String>,
        prototype: Box<dyn Object>,
    ) -> Result<()> {
        let name = name.into();
        if self.frozen {
            return Err(ObjectError::RegistryFrozen(name));
        }
        if self.prototypes.contains_key(&name) {
            return Err(ObjectError::DuplicateRegistration(name));
        }
        if name != prototype.type_name() {
            tracing::warn!(
                alias = %name,
                type_name = prototype.type_name(),
                "registering type under an alias"
            );
        }
        tracing::debug!(type_name = %name, "registered type");
        self.prototypes.insert(name, prototype);
        Ok(())
    }

    /// Register `prototype` under its own type name.
    pub fn register(&mut self, prototype: Box<dyn Object>) -> Result<()> {
        let name = prototype.type_name().to_string();
        self.register_type(name, prototype)
    }

    /// Create a default-constructed instance of the type registered as `name`.
    pub fn create_instance(&self, name: &str) -> Result<Box<dyn Object>> {
        let prototype = self
            .prototypes
            .get(name)
            .ok_or_else(|| ObjectError::UnknownType(name.to_string()))?;
        tracing::trace!(type_name = name, "creating instance");
        Ok(prototype.clone_object())
    }

    /// The prototype registered as `name`.
    pub fn prototype(&self, name: &str) -> Option<&dyn Object> {
        self.prototypes.get(name).map(|p| &**p)
    }

    /// Whether `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.prototypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// End the registration phase.
    pub fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(types = self.prototypes.len(), "type registry frozen");
        }
        self.frozen = true;
    }

    /// Whether the registry is in its read-only phase.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();

/// The process-wide registry.
pub fn global_registry() -> &'static RwLock<TypeRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(TypeRegistry::new()))
}

/// Register a type in the process-wide registry.
pub fn register_type(name: impl Into<String>, prototype: Box<dyn Object>) -> Result<()> {
    global_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_type(name, prototype)
}

/// Create an instance from the process-wide registry.
pub fn create_instance(name: &str) -> Result<Box<dyn Object>> {
    with_registry(|registry| registry.create_instance(name))
}

/// Freeze the process-wide registry.
pub fn freeze_registry() {
    global_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .freeze();
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_registry<R>(f: impl FnOnce(&TypeRegistry) -> R) -> R {
    let registry = global_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}
