//! Caller-supplied element factories and their first-match-wins chain.

use std::fmt;
use std::sync::Arc;

use crate::context::ContextRef;
use crate::element::Element;
use crate::markup::AttributeSet;

/// Override hook consulted before default tag resolution.
///
/// Returning `None` is a deferral, not a failure: resolution continues with
/// the next factory in the chain and finally with the type registry.
pub trait Factory: Send + Sync {
    fn on_create_element(
        &self,
        name: &str,
        context: &ContextRef,
        attrs: &AttributeSet<'_>,
    ) -> Option<Box<dyn Element>>;
}

impl<F> Factory for F
where
    F: Fn(&str, &ContextRef, &AttributeSet<'_>) -> Option<Box<dyn Element>> + Send + Sync,
{
    fn on_create_element(
        &self,
        name: &str,
        context: &ContextRef,
        attrs: &AttributeSet<'_>,
    ) -> Option<Box<dyn Element>> {
        self(name, context, attrs)
    }
}

/// Wrap a closure as a shared factory.
pub fn factory_fn<F>(f: F) -> Arc<dyn Factory>
where
    F: Fn(&str, &ContextRef, &AttributeSet<'_>) -> Option<Box<dyn Element>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Immutable chain of factories.
#[derive(Clone)]
pub enum FactoryChain {
    Single(Arc<dyn Factory>),
    /// `first` is consulted before `second`.
    Merged(Arc<FactoryChain>, Arc<FactoryChain>),
}

impl FactoryChain {
    #[must_use]
    pub fn single(factory: Arc<dyn Factory>) -> Self {
        Self::Single(factory)
    }

    /// Chain two factories, `first` taking precedence.
    #[must_use]
    pub fn merge(first: Self, second: Self) -> Self {
        Self::Merged(Arc::new(first), Arc::new(second))
    }

    /// Number of leaf factories in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Merged(first, second) => first.len() + second.len(),
        }
    }

    /// A chain always holds at least one factory.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Factory for FactoryChain {
    fn on_create_element(
        &self,
        name: &str,
        context: &ContextRef,
        attrs: &AttributeSet<'_>,
    ) -> Option<Box<dyn Element>> {
        match self {
            Self::Single(factory) => factory.on_create_element(name, context, attrs),
            Self::Merged(first, second) => first
                .on_create_element(name, context, attrs)
                .or_else(|| second.on_create_element(name, context, attrs)),
        }
    }
}

impl fmt::Debug for FactoryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single"),
            Self::Merged(first, second) => f.debug_tuple("Merged").field(first).field(second).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::context::LayoutContext;
    use crate::element::widgets::View;
    use crate::markup::{MarkupStream, XmlMarkupStream};
    use crate::registry::TypeRegistry;

    fn context() -> ContextRef {
        LayoutContext::new("test", Arc::new(TypeRegistry::new())).into_ref()
    }

    fn stream_on_root(xml: &str) -> XmlMarkupStream {
        let mut stream = XmlMarkupStream::parse("test.xml", xml).unwrap();
        stream.next().unwrap();
        stream
    }

    /// Factory that only answers for one tag and counts its calls.
    fn answering(tag: &'static str, calls: Arc<AtomicUsize>) -> FactoryChain {
        FactoryChain::single(factory_fn(move |name, context, attrs| {
            calls.fetch_add(1, Ordering::SeqCst);
            (name == tag).then(|| Box::new(View::new(format!("factory.{tag}"), context, attrs)) as Box<dyn Element>)
        }))
    }

    #[test]
    fn test_single_defers_with_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = answering("A", Arc::clone(&calls));
        let stream = stream_on_root("<B/>");

        let result = chain.on_create_element("B", &context(), &AttributeSet::new(&stream));
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merged_first_match_wins() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let chain = FactoryChain::merge(
            answering("A", Arc::clone(&first_calls)),
            answering("A", Arc::clone(&second_calls)),
        );
        let stream = stream_on_root("<A/>");

        let element = chain
            .on_create_element("A", &context(), &AttributeSet::new(&stream))
            .unwrap();
        assert_eq!(element.type_name(), "factory.A");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_merged_falls_through_to_second() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let chain = FactoryChain::merge(
            answering("A", Arc::clone(&first_calls)),
            answering("B", Arc::clone(&second_calls)),
        );
        let stream = stream_on_root("<B/>");

        let element = chain
            .on_create_element("B", &context(), &AttributeSet::new(&stream))
            .unwrap();
        assert_eq!(element.type_name(), "factory.B");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(chain.len(), 2);
    }
}
