//! Generic widget implementations backing the standard widget registry.
//!
//! [`View`] is a leaf that records the attributes it was inflated with;
//! [`ViewGroup`] adds child ownership. Both remember the lifecycle calls they
//! received so callers can inspect an inflated tree.

use std::any::Any;
use std::collections::BTreeMap;

use super::{Container, Element, ElementId, LayoutParams};
use crate::context::ContextRef;
use crate::markup::AttributeSet;

/// Attributes copied into [`Element::properties`].
const RECORDED_ATTRIBUTES: [&str; 4] = ["id", "text", "orientation", "src"];

/// Leaf widget.
#[derive(Debug)]
pub struct View {
    id: ElementId,
    type_name: String,
    context_label: String,
    properties: BTreeMap<String, String>,
    layout_params: Option<LayoutParams>,
    focus_requested: bool,
    finish_count: usize,
}

impl View {
    /// Construct from the owning context and the tag attributes.
    #[must_use]
    pub fn new(type_name: impl Into<String>, context: &ContextRef, attrs: &AttributeSet<'_>) -> Self {
        let properties = RECORDED_ATTRIBUTES
            .iter()
            .filter_map(|key| attrs.get(key).map(|v| ((*key).to_string(), v.to_string())))
            .collect();
        Self {
            id: ElementId::next(),
            type_name: type_name.into(),
            context_label: context.label().to_string(),
            properties,
            layout_params: None,
            focus_requested: false,
            finish_count: 0,
        }
    }

    /// Value of the `id` attribute.
    #[must_use]
    pub fn view_id(&self) -> Option<&str> {
        self.properties.get("id").map(String::as_str)
    }

    /// Value of the `text` attribute.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.properties.get("text").map(String::as_str)
    }

    /// Label of the context the view was constructed in.
    #[must_use]
    pub fn context_label(&self) -> &str {
        &self.context_label
    }

    /// How many times `on_finish_inflate` ran.
    #[must_use]
    pub fn finish_count(&self) -> usize {
        self.finish_count
    }
}

impl Element for View {
    fn id(&self) -> ElementId {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn layout_params(&self) -> Option<&LayoutParams> {
        self.layout_params.as_ref()
    }

    fn set_layout_params(&mut self, params: LayoutParams) {
        self.layout_params = Some(params);
    }

    fn request_focus(&mut self) {
        self.focus_requested = true;
    }

    fn is_focus_requested(&self) -> bool {
        self.focus_requested
    }

    fn on_finish_inflate(&mut self) {
        self.finish_count += 1;
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.properties.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Container widget.
#[derive(Debug)]
pub struct ViewGroup {
    view: View,
    children: Vec<Box<dyn Element>>,
}

impl ViewGroup {
    #[must_use]
    pub fn new(type_name: impl Into<String>, context: &ContextRef, attrs: &AttributeSet<'_>) -> Self {
        Self {
            view: View::new(type_name, context, attrs),
            children: Vec::new(),
        }
    }

    /// The leaf state shared with [`View`].
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }
}

impl Element for ViewGroup {
    fn id(&self) -> ElementId {
        self.view.id
    }

    fn type_name(&self) -> &str {
        &self.view.type_name
    }

    fn layout_params(&self) -> Option<&LayoutParams> {
        self.view.layout_params()
    }

    fn set_layout_params(&mut self, params: LayoutParams) {
        self.view.set_layout_params(params);
    }

    /// Descendants first: the first child takes the focus, an empty group
    /// keeps it.
    fn request_focus(&mut self) {
        match self.children.first_mut() {
            Some(child) => child.request_focus(),
            None => self.view.request_focus(),
        }
    }

    fn is_focus_requested(&self) -> bool {
        self.view.is_focus_requested()
    }

    fn on_finish_inflate(&mut self) {
        self.view.on_finish_inflate();
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.view.properties()
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Container for ViewGroup {
    fn generate_layout_params(&self, attrs: &AttributeSet<'_>) -> LayoutParams {
        LayoutParams::from_attributes(self.view.id, attrs)
    }

    fn add_child(&mut self, mut child: Box<dyn Element>, params: LayoutParams) {
        child.set_layout_params(params);
        self.children.push(child);
    }

    fn children(&self) -> &[Box<dyn Element>] {
        &self.children
    }
}
