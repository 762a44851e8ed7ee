//! Payload kinds accepted by the format adapters
//!
//! Typed callers hand over `&str`, `String`, `&[u8]` or `Vec<u8>` and the
//! conversion is infallible. Callers holding an untyped document value
//! go through `Payload::try_from(&Value)`, which only accepts strings.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::error::WmapError;

/// Wire format of a workflow map document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infer the format from a file extension (`.json`, `.yaml`, `.yml`)
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{other}' (expected json or yaml)")),
        }
    }
}

/// A document to decode: text or raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl<'a> Payload<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "string",
            Payload::Bytes(_) => "bytes",
        }
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Payload<'static> {
    fn from(text: String) -> Self {
        Payload::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(text: &'a String) -> Self {
        Payload::Text(Cow::Borrowed(text.as_str()))
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Payload::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl From<Vec<u8>> for Payload<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Cow::Owned(bytes))
    }
}

impl<'a> TryFrom<&'a Value> for Payload<'a> {
    type Error = WmapError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Payload::Text(Cow::Borrowed(text.as_str()))),
            other => Err(WmapError::InvalidPayloadKind {
                kind: value_kind(other),
            }),
        }
    }
}

impl TryFrom<Value> for Payload<'static> {
    type Error = WmapError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Payload::Text(Cow::Owned(text))),
            other => Err(WmapError::InvalidPayloadKind {
                kind: value_kind(&other),
            }),
        }
    }
}

/// Short name of a document value's kind, for error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
