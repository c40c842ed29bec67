//! Gate that can veto instantiation of element types.

use std::sync::Arc;

use crate::registry::ElementType;

/// Consulted once per type name before an inflater first instantiates it.
///
/// The answer is remembered by the inflater; returning `false` aborts the
/// pass with [`InflaterError::NotAllowed`](crate::error::InflaterError::NotAllowed).
pub trait Filter: Send + Sync {
    fn on_load_type(&self, element_type: &ElementType) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&ElementType) -> bool + Send + Sync,
{
    fn on_load_type(&self, element_type: &ElementType) -> bool {
        self(element_type)
    }
}

/// Wrap a closure as a shared filter.
pub fn filter_fn<F>(f: F) -> Arc<dyn Filter>
where
    F: Fn(&ElementType) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}
