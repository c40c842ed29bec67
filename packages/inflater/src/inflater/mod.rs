//! The inflation engine.
//!
//! An [`Inflater`] turns a [`MarkupStream`](crate::markup::MarkupStream) into
//! a tree of [`Element`]s. Each START tag is resolved in this order:
//!
//! 1. the `<view class="...">` sentinel is replaced by its `class` attribute
//! 2. the installed [`FactoryChain`], if any
//! 3. for bare names, each built-in prefix in turn; otherwise the name as is
//!
//! Resolved constructors are memoized in a [`ConstructorCache`] shared by
//! every inflater (process-wide unless an explicit cache is supplied), while
//! filter decisions are remembered per inflater.

mod descent;
mod factory;
mod filter;
mod resolve;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{default_prefixes, validate_prefix, InflaterConfig};
use crate::context::ContextRef;
use crate::element::Element;
use crate::error::{InflaterError, Result};
use crate::registry::ConstructorCache;

pub use factory::{factory_fn, Factory, FactoryChain};
pub use filter::{filter_fn, Filter};

/// Result of an inflate call.
#[derive(Debug)]
pub enum Inflated<'p> {
    /// The supplied parent, now holding the inflated content.
    Parent(&'p mut (dyn Element + 'static)),
    /// The newly created root, owned by the caller.
    Root(Box<dyn Element>),
}

impl Inflated<'_> {
    /// The returned element.
    #[must_use]
    pub fn element(&self) -> &dyn Element {
        match self {
            Self::Parent(parent) => &**parent,
            Self::Root(root) => root.as_ref(),
        }
    }

    /// Whether the supplied parent was returned.
    #[must_use]
    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Parent(_))
    }

    /// Take the new root, if the parent was not returned.
    #[must_use]
    pub fn into_root(self) -> Option<Box<dyn Element>> {
        match self {
            Self::Parent(_) => None,
            Self::Root(root) => Some(root),
        }
    }
}

/// Builds element trees from markup.
///
/// One inflater serves one pass at a time. For concurrent use, give each
/// thread its own instance via [`clone_in_context`](Self::clone_in_context).
pub struct Inflater {
    context: ContextRef,
    prefixes: Arc<[String]>,
    cache: Arc<ConstructorCache>,
    factory: Option<FactoryChain>,
    factory_set: bool,
    filter: Option<Arc<dyn Filter>>,
    filter_decisions: HashMap<String, bool>,
    /// Context passed to constructors; pinned for the duration of a pass.
    constructor_context: Option<ContextRef>,
}

impl Inflater {
    /// Create an inflater using the process-wide constructor cache and the
    /// default prefixes.
    #[must_use]
    pub fn new(context: ContextRef) -> Self {
        Self::with_cache(context, ConstructorCache::global())
    }

    /// Create an inflater backed by an explicit constructor cache.
    #[must_use]
    pub fn with_cache(context: ContextRef, cache: Arc<ConstructorCache>) -> Self {
        Self {
            context,
            prefixes: default_prefixes().into(),
            cache,
            factory: None,
            factory_set: false,
            filter: None,
            filter_decisions: HashMap::new(),
            constructor_context: None,
        }
    }

    /// Replace the built-in prefix list. Every prefix must end with `.`.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        for prefix in &prefixes {
            validate_prefix(prefix)?;
        }
        self.prefixes = prefixes.into();
        Ok(self)
    }

    /// Create an inflater with the prefixes of a loaded config.
    pub fn from_config(context: ContextRef, config: &InflaterConfig) -> Result<Self> {
        Self::new(context).with_prefixes(config.prefixes.iter().cloned())
    }

    #[must_use]
    pub fn context(&self) -> &ContextRef {
        &self.context
    }

    /// Built-in prefixes in resolution order.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ConstructorCache> {
        &self.cache
    }

    /// Context handed to constructors outside a pass: the override set with
    /// [`set_constructor_context`](Self::set_constructor_context), if any.
    #[must_use]
    pub fn constructor_context(&self) -> Option<&ContextRef> {
        self.constructor_context.as_ref()
    }

    /// Give registered constructors a different context than the inflater's.
    ///
    /// Factories and resource loading keep using [`context`](Self::context).
    /// `None` goes back to the inflater's context.
    pub fn set_constructor_context(&mut self, context: Option<ContextRef>) {
        self.constructor_context = context;
    }

    #[must_use]
    pub fn factory(&self) -> Option<&FactoryChain> {
        self.factory.as_ref()
    }

    /// Install a factory. Allowed once per instance.
    ///
    /// A factory inherited through [`clone_in_context`](Self::clone_in_context)
    /// stays in place behind the new one.
    pub fn set_factory(&mut self, factory: Arc<dyn Factory>) -> Result<()> {
        if self.factory_set {
            return Err(InflaterError::IllegalState(
                "A factory has already been set on this inflater".to_string(),
            ));
        }
        self.factory_set = true;

        let leaf = FactoryChain::single(factory);
        self.factory = Some(match self.factory.take() {
            Some(inherited) => FactoryChain::merge(leaf, inherited),
            None => leaf,
        });
        tracing::debug!(
            factories = self.factory.as_ref().map_or(0, FactoryChain::len),
            "Factory installed"
        );
        Ok(())
    }

    #[must_use]
    pub fn filter(&self) -> Option<&Arc<dyn Filter>> {
        self.filter.as_ref()
    }

    /// Install a filter, forgetting every earlier decision.
    pub fn set_filter(&mut self, filter: Arc<dyn Filter>) {
        self.filter = Some(filter);
        self.filter_decisions.clear();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.filter_decisions.clear();
    }

    /// Cached filter decision for a fully-qualified type name.
    #[must_use]
    pub fn filter_decision(&self, name: &str) -> Option<bool> {
        self.filter_decisions.get(name).copied()
    }

    /// A new inflater bound to `context`.
    ///
    /// Factory, filter, prefixes and constructor cache carry over. Filter
    /// decisions start empty and the clone may install one more factory.
    #[must_use]
    pub fn clone_in_context(&self, context: ContextRef) -> Self {
        tracing::debug!(from = %self.context.label(), to = %context.label(), "Cloning inflater");
        Self {
            context,
            prefixes: Arc::clone(&self.prefixes),
            cache: Arc::clone(&self.cache),
            factory: self.factory.clone(),
            factory_set: false,
            filter: self.filter.clone(),
            filter_decisions: HashMap::new(),
            constructor_context: None,
        }
    }

    /// Context for the next constructor call.
    fn construction_context(&self) -> ContextRef {
        self.constructor_context
            .as_ref()
            .map_or_else(|| Arc::clone(&self.context), Arc::clone)
    }
}

impl fmt::Debug for Inflater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inflater")
            .field("context", &self.context.label())
            .field("prefixes", &self.prefixes)
            .field("factory", &self.factory)
            .field("has_filter", &self.filter.is_some())
            .field("filter_decisions", &self.filter_decisions.len())
            .finish_non_exhaustive()
    }
}
