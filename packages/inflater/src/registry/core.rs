//! Element type registry mapping fully-qualified names to constructors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{Constructor, ElementType};
use crate::config::validate_type_name;
use crate::context::ContextRef;
use crate::element::Element;
use crate::error::{BoxError, Result};
use crate::markup::AttributeSet;

struct RegisteredType {
    element_type: Arc<ElementType>,
    lookups: AtomicUsize,
}

/// Registry of the element types the toolkit can instantiate.
///
/// Types are registered ahead of time and looked up by exact name. Every
/// lookup is counted per name. Thread-safe; share it via `Arc<TypeRegistry>`.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, RegisteredType>>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with its (context, attributes) constructor.
    ///
    /// Re-registering a name replaces the previous type.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&ContextRef, &AttributeSet<'_>) -> std::result::Result<Box<dyn Element>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let constructor: Constructor = Arc::new(constructor);
        self.insert(ElementType::new(name, constructor))
    }

    /// Declare a type that has no usable constructor.
    pub fn declare(&self, name: impl Into<String>) -> Result<()> {
        self.insert(ElementType::without_constructor(name))
    }

    fn insert(&self, element_type: ElementType) -> Result<()> {
        validate_type_name(element_type.name())?;
        tracing::trace!(name = %element_type.name(), "Registering element type");
        self.types.write().insert(
            element_type.name().to_string(),
            RegisteredType {
                element_type: Arc::new(element_type),
                lookups: AtomicUsize::new(0),
            },
        );
        Ok(())
    }

    /// Look up a type by fully-qualified name.
    pub fn lookup(&self, name: &str) -> Option<Arc<ElementType>> {
        let types = self.types.read();
        let registered = types.get(name)?;
        registered.lookups.fetch_add(1, Ordering::Relaxed);
        Some(Arc::clone(&registered.element_type))
    }

    /// Check if a type is registered, without counting a lookup.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// How many times `lookup` found the given name.
    #[must_use]
    pub fn lookup_count(&self, name: &str) -> usize {
        self.types
            .read()
            .get(name)
            .map_or(0, |r| r.lookups.load(Ordering::Relaxed))
    }

    /// All registered names, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
