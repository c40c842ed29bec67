//! Element type registry and constructor cache.
//!
//! The registry maps fully-qualified type names to construction functions
//! registered ahead of time by the embedding toolkit. The constructor cache
//! memoizes resolved constructors so a name is looked up at most once.

mod cache;
mod config;
mod core;
mod types;

pub use cache::ConstructorCache;
pub use config::{create_widget_registry, WIDGET_TYPES};
pub use core::TypeRegistry;
pub use types::{CachedConstructor, Constructor, ElementType};
