//! Registry configuration for the standard widget set.

use super::core::TypeRegistry;
use crate::context::ContextRef;
use crate::element::widgets::{View, ViewGroup};
use crate::element::Element;
use crate::error::Result;
use crate::markup::AttributeSet;

/// Standard widget types: fully-qualified name and whether it holds children.
pub const WIDGET_TYPES: &[(&str, bool)] = &[
    // Base types
    ("ui.view.View", false),
    ("ui.view.ViewGroup", true),
    ("ui.view.SurfaceView", false),
    // Layout containers
    ("ui.widget.LinearLayout", true),
    ("ui.widget.FrameLayout", true),
    ("ui.widget.RelativeLayout", true),
    ("ui.widget.ScrollView", true),
    // Leaf widgets
    ("ui.widget.TextView", false),
    ("ui.widget.Button", false),
    ("ui.widget.EditText", false),
    ("ui.widget.ImageView", false),
    ("ui.widget.CheckBox", false),
    // Web content
    ("ui.web.WebView", false),
];

/// Create a registry holding every type in [`WIDGET_TYPES`].
pub fn create_widget_registry() -> Result<TypeRegistry> {
    let registry = TypeRegistry::new();

    for &(name, is_container) in WIDGET_TYPES {
        if is_container {
            registry.register(name, move |context: &ContextRef, attrs: &AttributeSet<'_>| {
                Ok(Box::new(ViewGroup::new(name, context, attrs)) as Box<dyn Element>)
            })?;
        } else {
            registry.register(name, move |context: &ContextRef, attrs: &AttributeSet<'_>| {
                Ok(Box::new(View::new(name, context, attrs)) as Box<dyn Element>)
            })?;
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_widget_registry() {
        let registry = create_widget_registry().unwrap();

        assert_eq!(registry.len(), WIDGET_TYPES.len());
        assert!(registry.contains("ui.widget.LinearLayout"));
        assert!(registry.contains("ui.widget.TextView"));
        assert!(registry.contains("ui.web.WebView"));
        assert!(registry.contains("ui.view.View"));
        assert!(!registry.contains("LinearLayout"));
    }
}
