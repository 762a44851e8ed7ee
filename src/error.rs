//! Error types with fix suggestions

use thiserror::Error;

use crate::namespace::NamespaceError;
use crate::payload::Format;

/// Result alias for workflow map operations
pub type Result<T> = std::result::Result<T, WmapError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum WmapError {
    // ─────────────────────────────────────────────────────────────
    // Decoding errors (WMAP-010 to WMAP-011)
    // ─────────────────────────────────────────────────────────────

    #[error("WMAP-010: Payload to convert must be a string or bytes, got {kind}")]
    InvalidPayloadKind { kind: &'static str },

    #[error("WMAP-011: {format} decode error: {message}")]
    Deserialization { format: Format, message: String },

    // ─────────────────────────────────────────────────────────────
    // Tree construction errors (WMAP-020 to WMAP-021)
    // ─────────────────────────────────────────────────────────────

    #[error("WMAP-020: Cannot add workflow node type ({kind}) to {parent} node as child")]
    UnsupportedChildType { kind: String, parent: &'static str },

    #[error("WMAP-021: Invalid metric namespace '{namespace}': {reason}")]
    InvalidNamespaceFormat { namespace: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Encoding errors (WMAP-030)
    // ─────────────────────────────────────────────────────────────

    #[error("WMAP-030: {format} encode error: {message}")]
    Serialization { format: Format, message: String },
}

impl WmapError {
    pub(crate) fn decode(format: Format, err: impl std::fmt::Display) -> Self {
        WmapError::Deserialization {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(format: Format, err: impl std::fmt::Display) -> Self {
        WmapError::Serialization {
            format,
            message: err.to_string(),
        }
    }

    /// Stable error code (the `WMAP-0xx` prefix)
    pub fn code(&self) -> &'static str {
        match self {
            WmapError::InvalidPayloadKind { .. } => "WMAP-010",
            WmapError::Deserialization { .. } => "WMAP-011",
            WmapError::UnsupportedChildType { .. } => "WMAP-020",
            WmapError::InvalidNamespaceFormat { .. } => "WMAP-021",
            WmapError::Serialization { .. } => "WMAP-030",
        }
    }
}

impl From<NamespaceError> for WmapError {
    fn from(err: NamespaceError) -> Self {
        WmapError::InvalidNamespaceFormat {
            namespace: err.namespace().to_string(),
            reason: err.reason().to_string(),
        }
    }
}

impl FixSuggestion for WmapError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WmapError::InvalidPayloadKind { .. } => {
                Some("Pass the document as a string or raw bytes")
            }
            WmapError::Deserialization { format: Format::Json, .. } => {
                Some("Check JSON syntax and field names (collect, metric_namespaces, process, publish)")
            }
            WmapError::Deserialization { format: Format::Yaml, .. } => {
                Some("Check YAML syntax: indentation, quoting and field names")
            }
            WmapError::UnsupportedChildType { .. } => {
                Some("Only process and publish nodes can be children")
            }
            WmapError::InvalidNamespaceFormat { .. } => {
                Some("Use an absolute slash-delimited path like /intel/cpu/load")
            }
            WmapError::Serialization { .. } => None,
        }
    }
}
