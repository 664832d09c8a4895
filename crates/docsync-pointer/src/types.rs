//! Type definitions for document paths.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A step in a document path.
///
/// Either a mapping key or a sequence index. Serialized untagged, so a path
/// reads as `["paths", "/pets", 0]` in JSON payloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Index(usize),
    Key(String),
}

/// A path from the document root.
pub type Path = Vec<Step>;

impl Step {
    /// Create a key step.
    pub fn key(k: impl Into<String>) -> Self {
        Step::Key(k.into())
    }

    /// Create an index step.
    pub fn index(i: usize) -> Self {
        Step::Index(i)
    }

    /// Parse one reference token. Canonical decimal integers become
    /// [`Step::Index`], everything else is a [`Step::Key`].
    pub fn from_token(token: &str) -> Self {
        if is_valid_index(token) {
            if let Ok(idx) = token.parse() {
                return Step::Index(idx);
            }
        }
        Step::Key(token.to_string())
    }

    /// The step as a mapping key. Indices are rendered in decimal, so
    /// `Index(200)` addresses the `"200"` entry of a mapping.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Step::Key(k) => Cow::Borrowed(k),
            Step::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The step as a sequence index, if it can be one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Step::Index(i) => Some(*i),
            Step::Key(k) if is_valid_index(k) => k.parse().ok(),
            Step::Key(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Step::Index(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(k) => f.write_str(k),
            Step::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Step {
    fn from(s: &str) -> Self {
        Step::Key(s.to_owned())
    }
}

impl From<String> for Step {
    fn from(s: String) -> Self {
        Step::Key(s)
    }
}

impl From<usize> for Step {
    fn from(i: usize) -> Self {
        Step::Index(i)
    }
}

/// Check if a string is a canonical non-negative decimal index.
///
/// `"0"` and `"12"` are, `"01"`, `"-1"` and `"1.5"` are not.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}
