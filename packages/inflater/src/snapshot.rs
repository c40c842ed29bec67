//! Serializable snapshots of inflated element trees.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::element::{children_of, Element, LayoutParams};
use crate::error::Result;

/// Layout parameters as written in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSnapshot {
    pub width: String,
    pub height: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl From<&LayoutParams> for LayoutSnapshot {
    fn from(params: &LayoutParams) -> Self {
        Self {
            width: params.width.to_string(),
            height: params.height.to_string(),
            extras: params.extras.clone(),
        }
    }
}

/// Owned copy of an element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutSnapshot>,
    #[serde(skip_serializing_if = "is_false")]
    pub focus_requested: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes fields by reference
fn is_false(value: &bool) -> bool {
    !*value
}

impl ElementSnapshot {
    /// Capture an element and its whole subtree.
    #[must_use]
    pub fn capture(element: &dyn Element) -> Self {
        Self {
            type_name: element.type_name().to_string(),
            properties: element.properties(),
            layout: element.layout_params().map(LayoutSnapshot::from),
            focus_requested: element.is_focus_requested(),
            children: children_of(element)
                .iter()
                .map(|child| Self::capture(child.as_ref()))
                .collect(),
        }
    }

    /// Number of elements in the snapshot, itself included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// Render as a YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml_ng::to_string(self)?;
        let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
        Ok(format!("---\n{}\n", lines.join("\n")))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as an indented tree, one element per line.
    #[must_use]
    pub fn to_tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, level: usize) {
        let _ = write!(out, "{}{}", "  ".repeat(level), self.type_name);
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(key, value)| format!("{key}={value:?}"))
                .collect();
            let _ = write!(out, " [{}]", props.join(", "));
        }
        if let Some(layout) = &self.layout {
            let _ = write!(out, " ({} x {})", layout.width, layout.height);
        }
        if self.focus_requested {
            out.push_str(" *focus*");
        }
        out.push('\n');

        for child in &self.children {
            child.write_tree(out, level + 1);
        }
    }
}
