//! Error types for the inflater.
//!
//! Every failure during an inflation pass is fatal to that pass. The variants
//! below carry the markup position and the attempted type name so callers can
//! point at the offending tag.

use thiserror::Error;

use crate::context::ResourceId;

/// Boxed error produced by element constructors and other collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the inflater library.
#[derive(Debug, Error)]
pub enum InflaterError {
    /// No registered element type matched the tag under any attempted prefix.
    #[error("{position}: Element type not found: {name}")]
    TypeNotFound { name: String, position: String },

    /// The installed filter vetoed the element type.
    #[error("{position}: Class not allowed to be inflated {name}")]
    NotAllowed { name: String, position: String },

    /// General structural or instantiation failure.
    #[error("{position}: {message}{}", .name.as_ref().map(|n| format!(" {n}")).unwrap_or_default())]
    Inflate {
        name: Option<String>,
        position: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A factory was already installed on this inflater.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Malformed markup reported by the stream.
    #[error("{position}: Malformed markup: {message}")]
    Markup { position: String, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// No layout is registered under the given resource id.
    #[error("Layout resource not found: {0}")]
    ResourceNotFound(ResourceId),

    /// Resource id is neither hex (`0x...`) nor decimal.
    #[error("Invalid resource id: '{0}'")]
    InvalidResourceId(String),

    /// Type name or prefix does not follow the dotted naming scheme.
    #[error("Invalid type name: '{0}'. Expected dotted identifiers (e.g., ui.widget.TextView)")]
    InvalidTypeName(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InflaterError {
    /// Build an `Inflate` error for a named element type.
    pub fn inflate(
        position: impl Into<String>,
        message: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::Inflate {
            name: Some(name.into()),
            position: position.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Build an `Inflate` error that is not tied to a type name.
    pub fn structural(position: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Inflate {
            name: None,
            position: position.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to an `Inflate` error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_source(self, cause: BoxError) -> Self {
        match self {
            Self::Inflate {
                name,
                position,
                message,
                ..
            } => Self::Inflate {
                name,
                position,
                message,
                source: Some(cause),
            },
            other => other,
        }
    }

    /// Whether this error is the "type not found" resolution failure.
    #[must_use]
    pub fn is_type_not_found(&self) -> bool {
        matches!(self, Self::TypeNotFound { .. })
    }
}

/// Result type alias for inflater operations.
pub type Result<T> = std::result::Result<T, InflaterError>;
