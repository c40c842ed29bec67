//! Owning context handed to every element constructor.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::InflaterConfig;
use crate::error::{InflaterError, Result};
use crate::markup::{MarkupStream, XmlMarkupStream};
use crate::registry::TypeRegistry;

/// Numeric handle of a layout resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = InflaterError;

    /// Parse `0x`-prefixed hex or plain decimal.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse(),
        };
        parsed
            .map(Self)
            .map_err(|_| InflaterError::InvalidResourceId(s.to_string()))
    }
}

/// Services the inflater needs from its surroundings.
pub trait Context: Send + Sync + fmt::Debug {
    /// Short name used in diagnostics.
    fn label(&self) -> &str;

    /// Registry the context resolves element types against.
    fn type_registry(&self) -> &TypeRegistry;

    /// Open the markup of a layout resource.
    fn open_layout(&self, resource: ResourceId) -> Result<Box<dyn MarkupStream>>;
}

/// Shared handle to a context.
pub type ContextRef = Arc<dyn Context>;

#[derive(Debug, Clone)]
struct LayoutSource {
    name: String,
    text: Arc<str>,
}

/// Context backed by an in-memory table of layout sources.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    label: String,
    registry: Arc<TypeRegistry>,
    layouts: Arc<HashMap<ResourceId, LayoutSource>>,
}

impl LayoutContext {
    /// Create a context with no layouts.
    #[must_use]
    pub fn new(label: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            label: label.into(),
            registry,
            layouts: Arc::new(HashMap::new()),
        }
    }

    /// Build a context whose layouts come from the config's layout table.
    pub fn from_config(
        label: impl Into<String>,
        registry: Arc<TypeRegistry>,
        config: &InflaterConfig,
    ) -> Result<Self> {
        let mut context = Self::new(label, registry);
        for (raw_id, path) in config.layout_paths() {
            let id: ResourceId = raw_id.parse()?;
            context.load_layout(id, &path)?;
        }
        Ok(context)
    }

    /// Add a layout from markup text.
    pub fn add_layout(&mut self, id: ResourceId, name: impl Into<String>, text: impl Into<Arc<str>>) {
        let source = LayoutSource {
            name: name.into(),
            text: text.into(),
        };
        Arc::make_mut(&mut self.layouts).insert(id, source);
    }

    /// Builder form of [`add_layout`](Self::add_layout).
    #[must_use]
    pub fn with_layout(
        mut self,
        id: ResourceId,
        name: impl Into<String>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        self.add_layout(id, name, text);
        self
    }

    /// Read a layout file from disk.
    pub fn load_layout(&mut self, id: ResourceId, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());
        tracing::debug!(resource = %id, path = %path.display(), "Loaded layout resource");
        self.add_layout(id, name, text);
        Ok(())
    }

    /// A sibling context with another label, sharing registry and layouts.
    #[must_use]
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            registry: Arc::clone(&self.registry),
            layouts: Arc::clone(&self.layouts),
        }
    }

    /// Registered resource ids, sorted.
    #[must_use]
    pub fn layout_ids(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self.layouts.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Wrap in a shared handle.
    #[must_use]
    pub fn into_ref(self) -> ContextRef {
        Arc::new(self)
    }
}

impl Context for LayoutContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn open_layout(&self, resource: ResourceId) -> Result<Box<dyn MarkupStream>> {
        let source = self
            .layouts
            .get(&resource)
            .ok_or(InflaterError::ResourceNotFound(resource))?;
        let stream = XmlMarkupStream::parse(source.name.as_str(), &source.text)?;
        Ok(Box::new(stream))
    }
}
