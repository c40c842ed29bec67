//! Tag-to-type resolution and element construction.

use std::sync::Arc;

use super::{Factory, Inflater};
use crate::config::{is_qualified, TAG_VIEW, VIEW_CLASS_ATTRIBUTE};
use crate::element::Element;
use crate::error::{InflaterError, Result};
use crate::markup::AttributeSet;
use crate::registry::CachedConstructor;

impl Inflater {
    /// Instantiate `prefix + name` through the constructor cache.
    ///
    /// # Errors
    /// - `TypeNotFound` if the registry has no such type
    /// - `NotAllowed` if the filter vetoes it
    /// - `Inflate` if it has no usable constructor or the constructor fails
    pub fn create_element(
        &mut self,
        name: &str,
        prefix: Option<&str>,
        attrs: &AttributeSet<'_>,
    ) -> Result<Box<dyn Element>> {
        let qualified = match prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        };
        let position = attrs.position_description();

        let entry = match self.cache.get(&qualified) {
            Some(entry) => {
                self.check_cached(&entry, &qualified, &position)?;
                entry
            }
            None => self.resolve(&qualified, &position)?,
        };

        let context = self.construction_context();
        entry.construct(&context, attrs).map_err(|cause| {
            tracing::debug!(name = %qualified, error = %cause, "Constructor failed");
            InflaterError::inflate(position, "Error inflating class", qualified).with_source(cause)
        })
    }

    /// Create the element for a START tag: `<view>` sentinel, then factory,
    /// then built-in prefixes or the qualified name.
    pub fn create_element_from_tag(
        &mut self,
        tag: &str,
        attrs: &AttributeSet<'_>,
    ) -> Result<Box<dyn Element>> {
        let name = if tag == TAG_VIEW {
            attrs.get(VIEW_CLASS_ATTRIBUTE).ok_or_else(|| {
                InflaterError::inflate(
                    attrs.position_description(),
                    format!("Missing '{VIEW_CLASS_ATTRIBUTE}' attribute on"),
                    TAG_VIEW,
                )
            })?
        } else {
            tag
        };

        if let Some(factory) = &self.factory {
            if let Some(element) = factory.on_create_element(name, &self.context, attrs) {
                tracing::trace!(tag = %name, "Element created by factory");
                return Ok(element);
            }
        }

        if is_qualified(name) {
            self.create_element(name, None, attrs)
        } else {
            self.create_builtin_element(name, attrs)
        }
    }

    /// Try each built-in prefix in order; the first one that resolves wins.
    fn create_builtin_element(
        &mut self,
        name: &str,
        attrs: &AttributeSet<'_>,
    ) -> Result<Box<dyn Element>> {
        let prefixes = Arc::clone(&self.prefixes);
        for prefix in prefixes.iter() {
            match self.create_element(name, Some(prefix), attrs) {
                Err(err) if err.is_type_not_found() => continue,
                other => return other,
            }
        }
        Err(InflaterError::TypeNotFound {
            name: name.to_string(),
            position: attrs.position_description(),
        })
    }

    /// First-time resolution: registry lookup, filter, constructor.
    fn resolve(&mut self, qualified: &str, position: &str) -> Result<CachedConstructor> {
        tracing::trace!(name = %qualified, "Constructor cache miss");
        // Denied types are never cached, so a denial must be answered here.
        let decision = self.filter_decisions.get(qualified).copied();
        if decision == Some(false) {
            return Err(not_allowed(qualified, position));
        }

        let element_type = self
            .context
            .type_registry()
            .lookup(qualified)
            .ok_or_else(|| InflaterError::TypeNotFound {
                name: qualified.to_string(),
                position: position.to_string(),
            })?;

        if let (Some(filter), None) = (&self.filter, decision) {
            let allowed = filter.on_load_type(&element_type);
            self.filter_decisions.insert(qualified.to_string(), allowed);
            if !allowed {
                return Err(not_allowed(qualified, position));
            }
        }

        let constructor = element_type.constructor().cloned().ok_or_else(|| {
            InflaterError::inflate(
                position,
                "No (context, attributes) constructor for class",
                qualified,
            )
        })?;

        Ok(self
            .cache
            .insert(qualified, CachedConstructor::new(element_type, constructor)))
    }

    /// Filter check on a cache hit, remembering the decision.
    fn check_cached(
        &mut self,
        entry: &CachedConstructor,
        qualified: &str,
        position: &str,
    ) -> Result<()> {
        let Some(filter) = &self.filter else {
            return Ok(());
        };

        let allowed = match self.filter_decisions.get(qualified) {
            Some(&allowed) => allowed,
            None => {
                let allowed = filter.on_load_type(entry.element_type());
                self.filter_decisions.insert(qualified.to_string(), allowed);
                allowed
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(not_allowed(qualified, position))
        }
    }
}

fn not_allowed(name: &str, position: &str) -> InflaterError {
    tracing::debug!(name = %name, position = %position, "Filter denied element type");
    InflaterError::NotAllowed {
        name: name.to_string(),
        position: position.to_string(),
    }
}
