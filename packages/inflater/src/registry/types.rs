//! Types for the element type registry.

use std::fmt;
use std::sync::Arc;

use crate::config::NAMESPACE_SEPARATOR;
use crate::context::ContextRef;
use crate::element::Element;
use crate::error::BoxError;
use crate::markup::AttributeSet;

/// Two-argument constructor every inflatable type exposes:
/// owning context plus the attributes of the tag being inflated.
pub type Constructor = Arc<
    dyn Fn(&ContextRef, &AttributeSet<'_>) -> Result<Box<dyn Element>, BoxError> + Send + Sync,
>;

/// A registered element type.
#[derive(Clone)]
pub struct ElementType {
    name: String,
    constructor: Option<Constructor>,
}

impl ElementType {
    /// A type with a usable constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, constructor: Constructor) -> Self {
        Self {
            name: name.into(),
            constructor: Some(constructor),
        }
    }

    /// A type known by name but lacking the (context, attributes) constructor.
    #[must_use]
    pub fn without_constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
        }
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map_or(self.name.as_str(), |(_, simple)| simple)
    }

    #[must_use]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementType")
            .field("name", &self.name)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// A resolved constructor as held by the constructor cache.
#[derive(Clone)]
pub struct CachedConstructor {
    element_type: Arc<ElementType>,
    constructor: Constructor,
}

impl CachedConstructor {
    #[must_use]
    pub fn new(element_type: Arc<ElementType>, constructor: Constructor) -> Self {
        Self {
            element_type,
            constructor,
        }
    }

    /// The type the constructor belongs to, used for filter checks.
    #[must_use]
    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    /// Invoke the constructor.
    pub fn construct(
        &self,
        context: &ContextRef,
        attrs: &AttributeSet<'_>,
    ) -> Result<Box<dyn Element>, BoxError> {
        (self.constructor)(context, attrs)
    }

    /// Whether two entries share the same constructor.
    #[must_use]
    pub fn same_constructor(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.constructor, &other.constructor)
    }
}

impl fmt::Debug for CachedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedConstructor")
            .field("type", &self.element_type.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let ty = ElementType::without_constructor("ui.widget.TextView");
        assert_eq!(ty.simple_name(), "TextView");
        assert_eq!(ty.name(), "ui.widget.TextView");

        let bare = ElementType::without_constructor("Plain");
        assert_eq!(bare.simple_name(), "Plain");
    }

    #[test]
    fn test_without_constructor() {
        let ty = ElementType::without_constructor("ui.view.Abstract");
        assert!(ty.constructor().is_none());
        assert!(format!("{ty:?}").contains("has_constructor: false"));
    }
}
