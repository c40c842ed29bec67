//! Root handling and recursive descent over the markup stream.

use super::{Inflated, Inflater};
use crate::config::{TAG_MERGE, TAG_REQUEST_FOCUS};
use crate::context::ResourceId;
use crate::element::{Element, LayoutParams};
use crate::error::{InflaterError, Result};
use crate::markup::{AttributeSet, MarkupEvent, MarkupStream};

const MERGE_USAGE: &str = "<merge /> can be used only with a valid parent and attach=true";

impl Inflater {
    /// Inflate a layout resource from the owning context.
    ///
    /// Attaches to `parent` when one is given.
    pub fn inflate_resource<'p>(
        &mut self,
        resource: ResourceId,
        parent: Option<&'p mut (dyn Element + 'static)>,
    ) -> Result<Inflated<'p>> {
        let attach = parent.is_some();
        self.inflate_resource_with_attach(resource, parent, attach)
    }

    /// Inflate a layout resource. The stream is closed whatever the outcome.
    pub fn inflate_resource_with_attach<'p>(
        &mut self,
        resource: ResourceId,
        parent: Option<&'p mut (dyn Element + 'static)>,
        attach: bool,
    ) -> Result<Inflated<'p>> {
        tracing::debug!(resource = %resource, attach, "Inflating layout resource");
        let mut stream = self.context.open_layout(resource)?;
        let result = self.inflate_with_attach(stream.as_mut(), parent, attach);
        stream.close();
        result
    }

    /// Inflate from a stream, attaching to `parent` when one is given.
    pub fn inflate<'p>(
        &mut self,
        stream: &mut dyn MarkupStream,
        parent: Option<&'p mut (dyn Element + 'static)>,
    ) -> Result<Inflated<'p>> {
        let attach = parent.is_some();
        self.inflate_with_attach(stream, parent, attach)
    }

    /// Inflate from a stream.
    ///
    /// Returns the parent when one is given and `attach` is set, the new
    /// root otherwise. With a parent but no attach, the root only receives
    /// layout params generated by the parent.
    pub fn inflate_with_attach<'p>(
        &mut self,
        stream: &mut dyn MarkupStream,
        parent: Option<&'p mut (dyn Element + 'static)>,
        attach: bool,
    ) -> Result<Inflated<'p>> {
        let pinned = self.construction_context();
        let previous = self.constructor_context.replace(pinned);
        let result = self.inflate_root(stream, parent, attach);
        self.constructor_context = previous;
        result
    }

    fn inflate_root<'p>(
        &mut self,
        stream: &mut dyn MarkupStream,
        parent: Option<&'p mut (dyn Element + 'static)>,
        attach: bool,
    ) -> Result<Inflated<'p>> {
        // Look for the root node
        loop {
            match stream.next()? {
                MarkupEvent::StartTag => break,
                MarkupEvent::EndDocument => {
                    return Err(InflaterError::structural(
                        stream.position_description(),
                        "No start tag found!",
                    ));
                }
                MarkupEvent::EndTag | MarkupEvent::Text => {}
            }
        }

        let name = stream.name().unwrap_or_default().to_string();
        let position = stream.position_description();

        if name == TAG_MERGE {
            let Some(parent) = parent.filter(|_| attach) else {
                return Err(InflaterError::structural(position, MERGE_USAGE));
            };
            tracing::debug!(parent = %parent.type_name(), "Merging children into parent");
            self.inflate_children(stream, &mut *parent)?;
            return Ok(Inflated::Parent(parent));
        }

        let attrs = AttributeSet::new(&*stream);
        let mut root = self.create_element_from_tag(&name, &attrs)?;
        let params = match parent.as_deref() {
            Some(parent) => Some(layout_params_for(parent, &attrs, root.type_name())?),
            None => None,
        };
        tracing::debug!(root = %root.type_name(), has_parent = params.is_some(), attach, "Inflating root");

        let attach_params = match params {
            Some(params) if attach => Some(params),
            Some(params) => {
                root.set_layout_params(params);
                None
            }
            None => None,
        };

        self.inflate_children(stream, root.as_mut())?;

        match (parent, attach_params) {
            (Some(parent), Some(params)) => {
                attach_child(&mut *parent, root, params, &position)?;
                Ok(Inflated::Parent(parent))
            }
            _ => Ok(Inflated::Root(root)),
        }
    }

    /// Inflate every child of `parent`, then finish `parent`.
    ///
    /// Stops at the END tag closing the subtree the stream is positioned on,
    /// or at the end of the document.
    pub fn inflate_children(
        &mut self,
        stream: &mut dyn MarkupStream,
        parent: &mut dyn Element,
    ) -> Result<()> {
        let depth = stream.depth();

        loop {
            match stream.next()? {
                MarkupEvent::EndDocument => break,
                MarkupEvent::EndTag if stream.depth() <= depth => break,
                MarkupEvent::StartTag => {}
                MarkupEvent::EndTag | MarkupEvent::Text => continue,
            }

            let name = stream.name().unwrap_or_default().to_string();
            if name == TAG_REQUEST_FOCUS {
                parent.request_focus();
                skip_subtree(stream)?;
                continue;
            }

            let attrs = AttributeSet::new(&*stream);
            let position = attrs.position_description();
            let mut child = self.create_element_from_tag(&name, &attrs)?;
            let params = layout_params_for(&*parent, &attrs, child.type_name())?;
            tracing::trace!(tag = %name, parent = %parent.type_name(), "Created child element");

            self.inflate_children(stream, child.as_mut())?;
            // The child is owned by its subtree pass; attach once it is finished.
            attach_child(parent, child, params, &position)?;
        }

        parent.on_finish_inflate();
        Ok(())
    }
}

/// Consume events up to the END tag matching the current START.
fn skip_subtree(stream: &mut dyn MarkupStream) -> Result<()> {
    let depth = stream.depth();
    loop {
        match stream.next()? {
            MarkupEvent::EndDocument => return Ok(()),
            MarkupEvent::EndTag if stream.depth() <= depth => return Ok(()),
            _ => {}
        }
    }
}

fn layout_params_for(
    parent: &dyn Element,
    attrs: &AttributeSet<'_>,
    child: &str,
) -> Result<LayoutParams> {
    match parent.as_container() {
        Some(container) => Ok(container.generate_layout_params(attrs)),
        None => Err(not_a_container(
            attrs.position_description(),
            parent.type_name(),
            child,
        )),
    }
}

fn attach_child(
    parent: &mut dyn Element,
    child: Box<dyn Element>,
    params: LayoutParams,
    position: &str,
) -> Result<()> {
    let parent_type = parent.type_name().to_string();
    match parent.as_container_mut() {
        Some(container) => {
            container.add_child(child, params);
            Ok(())
        }
        None => Err(not_a_container(position, &parent_type, child.type_name())),
    }
}

fn not_a_container(position: impl Into<String>, parent: &str, child: &str) -> InflaterError {
    InflaterError::inflate(
        position,
        format!("{parent} is not a container, cannot attach"),
        child,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::{ContextRef, LayoutContext};
    use crate::element::children_of;
    use crate::markup::XmlMarkupStream;
    use crate::registry::{create_widget_registry, ConstructorCache};

    fn inflater() -> Inflater {
        let context: ContextRef =
            LayoutContext::new("test", Arc::new(create_widget_registry().unwrap())).into_ref();
        Inflater::with_cache(context, Arc::new(ConstructorCache::new()))
    }

    fn stream(xml: &str) -> XmlMarkupStream {
        XmlMarkupStream::parse("test.xml", xml).unwrap()
    }

    fn type_names(element: &dyn Element) -> Vec<&str> {
        children_of(element).iter().map(|c| c.type_name()).collect()
    }

    #[test]
    fn test_inflate_nested_tree() {
        let mut inflater = inflater();
        let mut stream = stream(
            "<LinearLayout><TextView/><FrameLayout><Button/></FrameLayout></LinearLayout>",
        );

        let root = inflater.inflate(&mut stream, None).unwrap().into_root().unwrap();
        assert_eq!(root.type_name(), "ui.widget.LinearLayout");
        assert_eq!(type_names(root.as_ref()), vec!["ui.widget.TextView", "ui.widget.FrameLayout"]);
        assert_eq!(
            type_names(children_of(root.as_ref())[1].as_ref()),
            vec!["ui.widget.Button"]
        );
    }

    #[test]
    fn test_leading_text_before_root() {
        let mut inflater = inflater();
        let mut stream = stream("<!-- header --><TextView/>");

        let root = inflater.inflate(&mut stream, None).unwrap().into_root().unwrap();
        assert_eq!(root.type_name(), "ui.widget.TextView");
    }

    #[test]
    fn test_request_focus_on_root() {
        let mut inflater = inflater();
        let mut stream = stream("<LinearLayout><requestFocus><ignored/></requestFocus></LinearLayout>");

        let root = inflater.inflate(&mut stream, None).unwrap().into_root().unwrap();
        assert!(root.is_focus_requested());
        assert!(children_of(root.as_ref()).is_empty());
    }

    #[test]
    fn test_children_of_leaf_fail() {
        let mut inflater = inflater();
        let mut stream = stream("<TextView><Button/></TextView>");

        let err = inflater.inflate(&mut stream, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test.xml line #1: ui.widget.TextView is not a container, cannot attach ui.widget.Button"
        );
    }

    #[test]
    fn test_constructor_context_restored_after_error() {
        let mut inflater = inflater();
        let mut stream = stream("<Bogus/>");

        assert!(inflater.inflate(&mut stream, None).is_err());
        assert!(inflater.constructor_context().is_none());
    }

    #[test]
    fn test_skip_subtree_stops_at_matching_end() {
        let mut stream = stream("<a><b><c/></b><d/></a>");
        stream.next().unwrap();
        stream.next().unwrap();
        assert_eq!(stream.name(), Some("b"));

        skip_subtree(&mut stream).unwrap();
        assert_eq!(stream.name(), Some("b"));
        assert_eq!(stream.next().unwrap(), MarkupEvent::StartTag);
        assert_eq!(stream.name(), Some("d"));
    }
}
