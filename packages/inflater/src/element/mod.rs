//! Element model consumed and produced by the inflater.
//!
//! The embedding toolkit supplies concrete element types; the inflater only
//! relies on the [`Element`] and [`Container`] traits defined here.

mod params;
pub mod widgets;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::markup::AttributeSet;

pub use params::{Dimension, LayoutParams, LAYOUT_ATTRIBUTE_PREFIX};

/// Stable identity of an element, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the inflated tree.
pub trait Element: fmt::Debug {
    /// Stable identity.
    fn id(&self) -> ElementId;

    /// Fully-qualified type name the element was created as.
    fn type_name(&self) -> &str;

    /// Layout parameters assigned by a container, if any.
    fn layout_params(&self) -> Option<&LayoutParams>;

    fn set_layout_params(&mut self, params: LayoutParams);

    /// Called for a `<requestFocus/>` directive nested in this element.
    fn request_focus(&mut self) {}

    /// Whether focus was requested during inflation.
    fn is_focus_requested(&self) -> bool {
        false
    }

    /// Called exactly once, after every child subtree has been inflated.
    fn on_finish_inflate(&mut self) {}

    /// Attribute-derived properties, for diagnostics and snapshots.
    fn properties(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Container view of this element; `None` for leaves.
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// An element that can own children.
pub trait Container {
    /// Build layout parameters for a child from the child's tag attributes.
    fn generate_layout_params(&self, attrs: &AttributeSet<'_>) -> LayoutParams;

    /// Take ownership of a child.
    fn add_child(&mut self, child: Box<dyn Element>, params: LayoutParams);

    /// Children in attachment order.
    fn children(&self) -> &[Box<dyn Element>];
}

/// Children of an element, empty for leaves.
#[must_use]
pub fn children_of(element: &dyn Element) -> &[Box<dyn Element>] {
    element.as_container().map(|c| c.children()).unwrap_or(&[])
}

/// Downcast an element to a concrete type.
#[must_use]
pub fn downcast_ref<T: Element + 'static>(element: &dyn Element) -> Option<&T> {
    element.as_any().downcast_ref::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_element_id_display() {
        let id = ElementId::next();
        assert_eq!(id.to_string(), format!("#{}", id.get()));
    }
}
