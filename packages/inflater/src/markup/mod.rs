//! Markup input for the inflater.
//!
//! The inflater consumes any [`MarkupStream`]; [`XmlMarkupStream`] is the
//! bundled implementation over plain XML text.

mod stream;
mod xml;

pub use stream::{AttributeSet, MarkupEvent, MarkupStream};
pub use xml::XmlMarkupStream;
