//! Metric namespace newtype
//!
//! A namespace names a metric or metric group as an absolute,
//! slash-delimited path: `/intel/cpu/load`.
//!
//! Guarantees:
//! - Leading slash
//! - One or more non-empty segments
//! - No whitespace, no trailing slash

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `/seg` repeated at least once, segments free of `/` and whitespace
static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/[^/\s]+)+$").expect("namespace pattern is valid"));

/// Validated metric namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetricNamespace(String);

impl MetricNamespace {
    /// Create a new namespace with validation
    pub fn new(ns: impl Into<String>) -> Result<Self, NamespaceError> {
        let ns = ns.into();

        if ns.is_empty() {
            return Err(NamespaceError::Empty(ns));
        }
        if !ns.starts_with('/') {
            return Err(NamespaceError::MissingLeadingSlash(ns));
        }
        if !NAMESPACE_PATTERN.is_match(&ns) {
            return Err(NamespaceError::Malformed(ns));
        }

        Ok(MetricNamespace(ns))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments without the separators
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').skip(1)
    }
}

impl Deref for MetricNamespace {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for MetricNamespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MetricNamespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricNamespace::new(s)
    }
}

impl TryFrom<String> for MetricNamespace {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MetricNamespace::new(value)
    }
}

impl TryFrom<&str> for MetricNamespace {
    type Error = NamespaceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MetricNamespace::new(value)
    }
}

impl From<MetricNamespace> for String {
    fn from(ns: MetricNamespace) -> Self {
        ns.0
    }
}

impl PartialEq<str> for MetricNamespace {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MetricNamespace {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    #[error("metric namespace cannot be empty")]
    Empty(String),
    #[error("metric namespace '{0}' must start with '/'")]
    MissingLeadingSlash(String),
    #[error("metric namespace '{0}' must match /segment/segment (no empty segments, no whitespace)")]
    Malformed(String),
}

impl NamespaceError {
    /// What is wrong, without repeating the input
    pub fn reason(&self) -> &'static str {
        match self {
            NamespaceError::Empty(_) => "cannot be empty",
            NamespaceError::MissingLeadingSlash(_) => "must start with '/'",
            NamespaceError::Malformed(_) => {
                "must match /segment/segment (no empty segments, no whitespace)"
            }
        }
    }

    /// The rejected input
    pub fn namespace(&self) -> &str {
        match self {
            NamespaceError::Empty(ns)
            | NamespaceError::MissingLeadingSlash(ns)
            | NamespaceError::Malformed(ns) => ns,
        }
    }
}
