//! Layout Inflater - Build live element trees from declarative layout markup.
//!
//! The inflater walks a pull-style markup stream, resolves every tag to a
//! registered element type, instantiates it with its owning context and the
//! tag's attributes, and wires the resulting elements into a tree.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use layout_inflater::{
//!     children_of, create_widget_registry, Element, Inflater, LayoutContext, XmlMarkupStream,
//! };
//!
//! let registry = Arc::new(create_widget_registry().unwrap());
//! let context = LayoutContext::new("app", registry).into_ref();
//! let mut inflater = Inflater::new(context);
//!
//! let mut stream = XmlMarkupStream::parse(
//!     "main.xml",
//!     "<LinearLayout><TextView/><requestFocus/></LinearLayout>",
//! )
//! .unwrap();
//! let root = inflater.inflate(&mut stream, None).unwrap().into_root().unwrap();
//!
//! assert_eq!(root.type_name(), "ui.widget.LinearLayout");
//! let children = children_of(root.as_ref());
//! assert_eq!(children.len(), 1);
//! assert!(children[0].is_focus_requested());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Reserved tags, naming validation and the YAML config
//! - [`error`]: Error types and Result alias
//! - [`markup`]: Markup stream trait and the XML implementation
//! - [`context`]: Owning context and layout resources
//! - [`element`]: Element and container traits, layout params, widgets
//! - [`registry`]: Type registry and constructor cache
//! - [`inflater`]: Factory chain, filter and the recursive descent
//! - [`snapshot`]: Serializable copies of inflated trees
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod context;
pub mod element;
pub mod error;
pub mod inflater;
pub mod markup;
pub mod registry;
pub mod snapshot;

// Re-export commonly used items
pub use context::{Context, ContextRef, LayoutContext, ResourceId};
pub use element::{children_of, downcast_ref, Container, Element, ElementId, LayoutParams};
pub use error::{InflaterError, Result};
pub use inflater::{factory_fn, filter_fn, Factory, FactoryChain, Filter, Inflated, Inflater};
pub use markup::{AttributeSet, MarkupEvent, MarkupStream, XmlMarkupStream};
pub use registry::{create_widget_registry, ConstructorCache, ElementType, TypeRegistry};
pub use snapshot::ElementSnapshot;
