//! Pull-style markup cursor consumed by the inflater.

use std::fmt;

use crate::error::Result;

/// Event reported by [`MarkupStream::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent {
    StartTag,
    EndTag,
    Text,
    EndDocument,
}

/// Forward-only cursor over a markup document.
///
/// Depth follows the pull-parser convention: `0` before the root, `1` on the
/// root's START and END events, and one more for every nesting level. While
/// positioned on a START event the stream doubles as the attribute accessor
/// for that tag.
pub trait MarkupStream {
    /// Advance to the next event.
    fn next(&mut self) -> Result<MarkupEvent>;

    /// Tag name of the current START or END event.
    fn name(&self) -> Option<&str>;

    /// Nesting depth of the current event.
    fn depth(&self) -> usize;

    /// Number of attributes on the current START tag.
    fn attribute_count(&self) -> usize;

    /// Local name of the attribute at `index`.
    fn attribute_name(&self, index: usize) -> Option<&str>;

    /// Value of the attribute at `index`.
    fn attribute_value_at(&self, index: usize) -> Option<&str>;

    /// Value of an attribute by namespace and local name.
    ///
    /// A `None` namespace matches the local name in any namespace.
    fn attribute_value(&self, namespace: Option<&str>, name: &str) -> Option<&str>;

    /// Human-readable position of the current event, for diagnostics.
    fn position_description(&self) -> String;

    /// Release the resources held by the stream.
    fn close(&mut self) {}
}

/// Read-only view of the attributes of the current START tag.
///
/// Only valid while the stream stays on that tag; the borrow enforces it.
#[derive(Clone, Copy)]
pub struct AttributeSet<'a> {
    stream: &'a dyn MarkupStream,
}

impl<'a> AttributeSet<'a> {
    /// Borrow the attributes of the stream's current tag.
    #[must_use]
    pub fn new(stream: &'a dyn MarkupStream) -> Self {
        Self { stream }
    }

    /// Attribute value by local name in any namespace.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.stream.attribute_value(None, name)
    }

    /// Attribute value by namespace URI and local name.
    #[must_use]
    pub fn get_ns(&self, namespace: &str, name: &str) -> Option<&'a str> {
        self.stream.attribute_value(Some(namespace), name)
    }

    /// Number of attributes on the tag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stream.attribute_count()
    }

    /// Whether the tag has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(local name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let stream = self.stream;
        (0..stream.attribute_count()).filter_map(move |i| {
            Some((stream.attribute_name(i)?, stream.attribute_value_at(i)?))
        })
    }

    /// Tag name the attributes belong to.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.stream.name()
    }

    /// Position of the tag, for diagnostics.
    #[must_use]
    pub fn position_description(&self) -> String {
        self.stream.position_description()
    }
}

impl fmt::Debug for AttributeSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
