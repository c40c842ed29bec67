//! Layout parameters generated by containers for their children.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::ElementId;
use crate::error::{InflaterError, Result};
use crate::markup::AttributeSet;

/// Attribute prefix shared by all layout parameters.
pub const LAYOUT_ATTRIBUTE_PREFIX: &str = "layout_";

/// Size request along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// As large as the parent allows.
    MatchParent,
    /// Just large enough for the content.
    #[default]
    WrapContent,
    /// A fixed size in pixels.
    Exact(u32),
}

impl FromStr for Dimension {
    type Err = InflaterError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "match_parent" | "fill_parent" => Ok(Self::MatchParent),
            "wrap_content" => Ok(Self::WrapContent),
            other => {
                let digits = other
                    .strip_suffix("px")
                    .or_else(|| other.strip_suffix("dip"))
                    .or_else(|| other.strip_suffix("dp"))
                    .unwrap_or(other);
                digits.parse().map(Self::Exact).map_err(|_| InflaterError::Markup {
                    position: String::new(),
                    message: format!("invalid dimension '{value}'"),
                })
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchParent => f.write_str("match_parent"),
            Self::WrapContent => f.write_str("wrap_content"),
            Self::Exact(px) => write!(f, "{px}px"),
        }
    }
}

/// Layout parameters for one child, generated by its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutParams {
    /// Container that generated these parameters.
    pub owner: ElementId,
    pub width: Dimension,
    pub height: Dimension,
    /// Remaining `layout_*` attributes, keyed without the prefix.
    pub extras: BTreeMap<String, String>,
}

impl LayoutParams {
    /// Parameters with explicit dimensions and no extras.
    #[must_use]
    pub fn new(owner: ElementId, width: Dimension, height: Dimension) -> Self {
        Self {
            owner,
            width,
            height,
            extras: BTreeMap::new(),
        }
    }

    /// Read `layout_width`, `layout_height` and any other `layout_*`
    /// attributes from the tag.
    ///
    /// Missing or unreadable dimensions fall back to `wrap_content`.
    #[must_use]
    pub fn from_attributes(owner: ElementId, attrs: &AttributeSet<'_>) -> Self {
        let mut params = Self::new(owner, Dimension::WrapContent, Dimension::WrapContent);

        for (name, value) in attrs.iter() {
            let Some(key) = name.strip_prefix(LAYOUT_ATTRIBUTE_PREFIX) else {
                continue;
            };
            match key {
                "width" | "height" => {
                    let dimension = value.parse().unwrap_or_else(|_| {
                        tracing::warn!(
                            attribute = %name,
                            value = %value,
                            position = %attrs.position_description(),
                            "Unreadable dimension, using wrap_content"
                        );
                        Dimension::WrapContent
                    });
                    if key == "width" {
                        params.width = dimension;
                    } else {
                        params.height = dimension;
                    }
                }
                _ => {
                    params.extras.insert(key.to_string(), value.to_string());
                }
            }
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkupStream, XmlMarkupStream};

    #[test]
    fn test_dimension_parse() {
        assert_eq!("match_parent".parse::<Dimension>().unwrap(), Dimension::MatchParent);
        assert_eq!("fill_parent".parse::<Dimension>().unwrap(), Dimension::MatchParent);
        assert_eq!("wrap_content".parse::<Dimension>().unwrap(), Dimension::WrapContent);
        assert_eq!("48dp".parse::<Dimension>().unwrap(), Dimension::Exact(48));
        assert_eq!("12px".parse::<Dimension>().unwrap(), Dimension::Exact(12));
        assert_eq!("7".parse::<Dimension>().unwrap(), Dimension::Exact(7));
        assert!("huge".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Exact(3).to_string(), "3px");
        assert_eq!(Dimension::MatchParent.to_string(), "match_parent");
    }

    #[test]
    fn test_from_attributes() {
        let xml = r#"<a layout_width="match_parent" layout_height="20dp" layout_weight="1" text="x"/>"#;
        let mut stream = XmlMarkupStream::parse("t.xml", xml).unwrap();
        stream.next().unwrap();
        let owner = ElementId::next();

        let params = LayoutParams::from_attributes(owner, &AttributeSet::new(&stream));
        assert_eq!(params.owner, owner);
        assert_eq!(params.width, Dimension::MatchParent);
        assert_eq!(params.height, Dimension::Exact(20));
        assert_eq!(params.extras.get("weight").map(String::as_str), Some("1"));
        assert!(!params.extras.contains_key("text"));
    }

    #[test]
    fn test_from_attributes_bad_dimension_falls_back() {
        let xml = r#"<a layout_width="wide"/>"#;
        let mut stream = XmlMarkupStream::parse("t.xml", xml).unwrap();
        stream.next().unwrap();

        let params = LayoutParams::from_attributes(ElementId::next(), &AttributeSet::new(&stream));
        assert_eq!(params.width, Dimension::WrapContent);
    }
}
