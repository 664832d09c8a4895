//! Internal, root-relative references (`#/components/schemas/Pet`).
//!
//! Only the `#/` scheme is supported. Tokens are taken literally: there is no
//! `~0`/`~1` or percent decoding, so a key containing `/` cannot be named.

use indexmap::IndexSet;
use serde_json::Value;
use thiserror::Error;

use crate::get;
use crate::types::{Path, Step};

/// The mapping key that marks a reference site.
pub const REF_KEY: &str = "$ref";

const ROOT_PREFIX: &str = "#/";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("external references are not supported: {0}")]
    External(String),
    #[error("reference must start with `#/`: {0}")]
    NotRootRelative(String),
}

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// The referenced node and the path to edit it at.
    Found { node: &'a Value, edit_path: Path },
    /// The reference is unsupported or names a missing location.
    NotFound,
    /// The reference is already on the current resolution chain. `chain`
    /// lists the chain in visiting order, ending with the repeated reference.
    Circular { chain: Vec<String> },
}

impl Resolution<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, Resolution::Circular { .. })
    }
}

/// Parse a reference into the path it names.
///
/// # Example
///
/// ```
/// use docsync_pointer::{parse_reference, Step};
///
/// let path = parse_reference("#/components/schemas/Pet").unwrap();
/// assert_eq!(path, vec![Step::key("components"), Step::key("schemas"), Step::key("Pet")]);
/// assert!(parse_reference("other.yaml#/Pet").is_err());
/// ```
pub fn parse_reference(reference: &str) -> Result<Path, ReferenceError> {
    if !reference.starts_with('#') {
        return Err(ReferenceError::External(reference.to_string()));
    }
    let rest = reference
        .strip_prefix(ROOT_PREFIX)
        .ok_or_else(|| ReferenceError::NotRootRelative(reference.to_string()))?;
    Ok(rest.split('/').map(Step::from_token).collect())
}

/// The path at which the node named by `reference` lives.
///
/// Form surfaces editing "through" a reference must write here rather than
/// at the `$ref` site. Returns `None` for unsupported references.
pub fn to_edit_path(reference: &str) -> Option<Path> {
    parse_reference(reference).ok()
}

/// Build a reference string from a path.
pub fn format_reference(path: &[Step]) -> String {
    let mut out = String::from("#");
    for step in path {
        out.push('/');
        out.push_str(&step.as_key());
    }
    if path.is_empty() {
        out.push('/');
    }
    out
}

/// Resolve a single reference against `doc`. Never mutates the document.
pub fn resolve<'a>(doc: &'a Value, reference: &str) -> Option<&'a Value> {
    let path = parse_reference(reference).ok()?;
    get(doc, &path)
}

/// The reference string held by a reference site (`{"$ref": "..."}`).
pub fn ref_target(node: &Value) -> Option<&str> {
    node.as_object()?.get(REF_KEY)?.as_str()
}

/// Visited-reference bookkeeping for one top-to-bottom resolution pass.
///
/// A successful [`enter`](Self::enter) puts the reference on the current
/// chain; the caller must [`leave`](Self::leave) it once the branch below it
/// is finished, so sibling references to the same target are not mistaken
/// for cycles. Drop the pass when the walk ends.
#[derive(Debug, Default, Clone)]
pub struct ResolutionPass {
    visited: IndexSet<String>,
}

impl ResolutionPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter<'a>(&mut self, doc: &'a Value, reference: &str) -> Resolution<'a> {
        if self.visited.contains(reference) {
            let mut chain: Vec<String> = self.visited.iter().cloned().collect();
            chain.push(reference.to_string());
            return Resolution::Circular { chain };
        }
        let Ok(edit_path) = parse_reference(reference) else {
            return Resolution::NotFound;
        };
        match get(doc, &edit_path) {
            Some(node) => {
                self.visited.insert(reference.to_string());
                Resolution::Found { node, edit_path }
            }
            None => Resolution::NotFound,
        }
    }

    /// Take `reference` off the chain. Returns `false` if it was not on it.
    pub fn leave(&mut self, reference: &str) -> bool {
        self.visited.shift_remove(reference)
    }

    /// References on the current chain, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.visited.len()
    }
}

/// Follow `$ref` hops starting at `reference` until a non-reference node.
///
/// # Example
///
/// ```
/// use docsync_pointer::{resolve_chain, Resolution};
/// use serde_json::json;
///
/// let doc = json!({"a": {"$ref": "#/b"}, "b": {"$ref": "#/a"}});
/// assert!(matches!(resolve_chain(&doc, "#/a"), Resolution::Circular { .. }));
/// ```
pub fn resolve_chain<'a>(doc: &'a Value, reference: &str) -> Resolution<'a> {
    let mut pass = ResolutionPass::new();
    let mut current = reference.to_string();
    loop {
        match pass.enter(doc, &current) {
            Resolution::Found { node, edit_path } => match ref_target(node) {
                Some(next) => current = next.to_string(),
                None => return Resolution::Found { node, edit_path },
            },
            other => return other,
        }
    }
}
