//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use layout_inflater::element::widgets::ViewGroup;
use layout_inflater::registry::WIDGET_TYPES;
use layout_inflater::{
    AttributeSet, Container, Context, ContextRef, Element, ElementId, InflaterError,
    LayoutContext, LayoutParams, MarkupEvent, MarkupStream, Result, ResourceId, TypeRegistry,
    XmlMarkupStream,
};

/// Load fixture file content.
pub fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Stream over a fixture file.
pub fn fixture_stream(name: &str) -> XmlMarkupStream {
    XmlMarkupStream::parse(name, &load_fixture(name)).unwrap()
}

/// Ordered record of lifecycle calls, shared by every recording element.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Element that logs `finish:<label>` and `focus:<label>` into a journal.
///
/// The label is the `id` attribute, or the type name when there is none.
#[derive(Debug)]
pub struct Recording {
    group: ViewGroup,
    label: String,
    container: bool,
    journal: Journal,
}

impl Recording {
    pub fn new(
        type_name: &str,
        container: bool,
        journal: Journal,
        context: &ContextRef,
        attrs: &AttributeSet<'_>,
    ) -> Self {
        let label = attrs.get("id").unwrap_or(type_name).to_string();
        Self {
            group: ViewGroup::new(type_name, context, attrs),
            label,
            container,
            journal,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn context_label(&self) -> &str {
        self.group.view().context_label()
    }
}

impl Element for Recording {
    fn id(&self) -> ElementId {
        self.group.id()
    }

    fn type_name(&self) -> &str {
        self.group.type_name()
    }

    fn layout_params(&self) -> Option<&LayoutParams> {
        self.group.layout_params()
    }

    fn set_layout_params(&mut self, params: LayoutParams) {
        self.group.set_layout_params(params);
    }

    fn request_focus(&mut self) {
        self.journal.push(format!("focus:{}", self.label));
    }

    fn on_finish_inflate(&mut self) {
        self.journal.push(format!("finish:{}", self.label));
        self.group.on_finish_inflate();
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.group.properties()
    }

    fn as_container(&self) -> Option<&dyn Container> {
        if self.container {
            Some(self)
        } else {
            None
        }
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        if self.container {
            Some(self)
        } else {
            None
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Container for Recording {
    fn generate_layout_params(&self, attrs: &AttributeSet<'_>) -> LayoutParams {
        self.group.generate_layout_params(attrs)
    }

    fn add_child(&mut self, child: Box<dyn Element>, params: LayoutParams) {
        self.group.add_child(child, params);
    }

    fn children(&self) -> &[Box<dyn Element>] {
        self.group.children()
    }
}

/// Registry with every standard widget name backed by [`Recording`].
pub fn recording_registry(journal: &Journal) -> TypeRegistry {
    let registry = TypeRegistry::new();
    for &(name, container) in WIDGET_TYPES {
        let journal = journal.clone();
        registry
            .register(name, move |context: &ContextRef, attrs: &AttributeSet<'_>| {
                Ok(Box::new(Recording::new(name, container, journal.clone(), context, attrs))
                    as Box<dyn Element>)
            })
            .unwrap();
    }
    registry
}

/// Context over a recording registry.
pub fn recording_context(label: &str, journal: &Journal) -> ContextRef {
    LayoutContext::new(label, Arc::new(recording_registry(journal))).into_ref()
}

/// Stream wrapper that counts `close` calls.
pub struct TrackingStream {
    inner: XmlMarkupStream,
    closes: Arc<AtomicUsize>,
}

impl MarkupStream for TrackingStream {
    fn next(&mut self) -> Result<MarkupEvent> {
        self.inner.next()
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn depth(&self) -> usize {
        self.inner.depth()
    }

    fn attribute_count(&self) -> usize {
        self.inner.attribute_count()
    }

    fn attribute_name(&self, index: usize) -> Option<&str> {
        self.inner.attribute_name(index)
    }

    fn attribute_value_at(&self, index: usize) -> Option<&str> {
        self.inner.attribute_value_at(index)
    }

    fn attribute_value(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.inner.attribute_value(namespace, name)
    }

    fn position_description(&self) -> String {
        self.inner.position_description()
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close();
    }
}

/// Context whose layouts are served through [`TrackingStream`]s.
#[derive(Debug)]
pub struct TrackingContext {
    registry: Arc<TypeRegistry>,
    layouts: HashMap<ResourceId, String>,
    closes: Arc<AtomicUsize>,
}

impl TrackingContext {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            layouts: HashMap::new(),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_layout(mut self, id: ResourceId, text: &str) -> Self {
        self.layouts.insert(id, text.to_string());
        self
    }

    /// Counter of closed streams.
    pub fn closes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl Context for TrackingContext {
    fn label(&self) -> &str {
        "tracking"
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn open_layout(&self, resource: ResourceId) -> Result<Box<dyn MarkupStream>> {
        let text = self
            .layouts
            .get(&resource)
            .ok_or(InflaterError::ResourceNotFound(resource))?;
        Ok(Box::new(TrackingStream {
            inner: XmlMarkupStream::parse(resource.to_string(), text)?,
            closes: Arc::clone(&self.closes),
        }))
    }
}
