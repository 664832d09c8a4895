//! Typed paths into a document tree and internal reference resolution.
//!
//! A document is a `serde_json::Value` whose root is usually a mapping. A
//! [`Path`] is a sequence of [`Step`]s, each a mapping key or a sequence index.
//! Lookups never fail loudly: a missing location is `None`, because callers
//! render partial and invalid documents.
//!
//! # Example
//!
//! ```
//! use docsync_pointer::{get, set, Step};
//! use serde_json::json;
//!
//! let doc = json!({"info": {"title": "Petstore"}});
//! let path = vec![Step::key("info"), Step::key("title")];
//! assert_eq!(get(&doc, &path), Some(&json!("Petstore")));
//!
//! let doc2 = set(&doc, &[Step::key("tags"), Step::index(0)], json!("pets"));
//! assert_eq!(doc2["tags"], json!(["pets"]));
//! // The input snapshot is untouched.
//! assert!(doc.get("tags").is_none());
//! ```

use serde_json::{Map, Value};

pub mod reference;
pub mod types;

pub use reference::{
    format_reference, parse_reference, ref_target, resolve, resolve_chain, to_edit_path,
    ReferenceError, Resolution, ResolutionPass, REF_KEY,
};
pub use types::{is_valid_index, Path, Step};

/// How many `null`s a write may add to pad a sequence up to the written index.
pub const MAX_INDEX_GAP: usize = 1024;

/// Look up the child of `container` addressed by a single step.
///
/// An index step on a mapping reads the decimal key, and a digit-only key
/// step on a sequence reads the index.
pub fn child<'a>(container: &'a Value, step: &Step) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(&*step.as_key()),
        Value::Array(arr) => arr.get(step.as_index()?),
        _ => None,
    }
}

/// Mutable counterpart of [`child`].
pub fn child_mut<'a>(container: &'a mut Value, step: &Step) -> Option<&'a mut Value> {
    match container {
        Value::Object(map) => map.get_mut(&*step.as_key()),
        Value::Array(arr) => arr.get_mut(step.as_index()?),
        _ => None,
    }
}

/// Get a value from a document by path.
///
/// Returns `None` if any step is missing. An explicit `null` is returned as
/// `Some(&Value::Null)`.
///
/// # Example
///
/// ```
/// use docsync_pointer::{get, Step};
/// use serde_json::json;
///
/// let doc = json!({"responses": {"200": {"description": "ok"}}});
/// let path = vec![Step::key("responses"), Step::index(200), Step::key("description")];
/// assert_eq!(get(&doc, &path), Some(&json!("ok")));
/// assert_eq!(get(&doc, &[Step::key("missing")]), None);
/// ```
pub fn get<'a>(doc: &'a Value, path: &[Step]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |current, step| child(current, step))
}

/// Get a mutable reference to a value by path.
pub fn get_mut<'a>(doc: &'a mut Value, path: &[Step]) -> Option<&'a mut Value> {
    let mut current = doc;
    for step in path {
        current = child_mut(current, step)?;
    }
    Some(current)
}

/// Return a copy of `doc` with `value` written at `path`.
///
/// Missing intermediate containers are created: a mapping when the next step
/// is a key, a sequence when it is an index. See [`set_in_place`]; a write
/// it refuses returns an unchanged copy.
pub fn set(doc: &Value, path: &[Step], value: Value) -> Value {
    let mut next = doc.clone();
    set_in_place(&mut next, path, value);
    next
}

/// Write `value` at `path` inside an owned document.
///
/// Writing past the end of a sequence pads it with `null`, by at most
/// [`MAX_INDEX_GAP`] elements. A scalar sitting where a container is needed
/// is replaced by one, as is a sequence addressed with a non-numeric key. An
/// empty path replaces the whole document.
///
/// Returns `false`, leaving `doc` untouched, when an index lies further past
/// a sequence end than the gap allows.
pub fn set_in_place(doc: &mut Value, path: &[Step], value: Value) -> bool {
    if !is_writable(doc, path) {
        return false;
    }
    let Some((last, parents)) = path.split_last() else {
        *doc = value;
        return true;
    };
    let mut current = doc;
    for (i, step) in parents.iter().enumerate() {
        let slot = slot_mut(current, step);
        if !slot.is_object() && !slot.is_array() {
            *slot = empty_container_for(&path[i + 1]);
        }
        current = slot;
    }
    *slot_mut(current, last) = value;
    true
}

/// Check that writing at `path` pads no sequence by more than
/// [`MAX_INDEX_GAP`] elements.
fn is_writable(doc: &Value, path: &[Step]) -> bool {
    let mut current = Some(doc);
    for step in path {
        let gap = match current {
            Some(Value::Object(_)) => 0,
            Some(Value::Array(arr)) => step
                .as_index()
                .map_or(0, |idx| idx.saturating_sub(arr.len())),
            // Absent or scalar: a fresh container takes its place.
            _ => match step {
                Step::Index(idx) => *idx,
                Step::Key(_) => 0,
            },
        };
        if gap > MAX_INDEX_GAP {
            return false;
        }
        current = current.and_then(|container| child(container, step));
    }
    true
}

/// Split a path into its parent path and final step.
///
/// Returns `None` for the root path.
pub fn split_parent(path: &[Step]) -> Option<(&[Step], &Step)> {
    let (last, parent) = path.split_last()?;
    Some((parent, last))
}

/// Check if `parent` is a strict prefix of `child`.
pub fn is_child(parent: &[Step], child: &[Step]) -> bool {
    parent.len() < child.len() && child[..parent.len()] == *parent
}

/// Render a path for humans and log fields: `paths./pets.get.tags[0]`.
pub fn format_path(path: &[Step]) -> String {
    let mut out = String::new();
    for step in path {
        match step {
            Step::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Step::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
        }
    }
    out
}

fn empty_container_for(step: &Step) -> Value {
    if step.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// The slot for `step` inside `container`, creating it (and, if needed, the
/// container itself) so that it exists.
fn slot_mut<'a>(container: &'a mut Value, step: &Step) -> &'a mut Value {
    let index = step.as_index();
    let fits = match &*container {
        Value::Object(_) => true,
        Value::Array(_) => index.is_some(),
        _ => false,
    };
    if !fits {
        *container = empty_container_for(step);
    }
    match container {
        Value::Array(arr) => {
            let idx = index.unwrap_or(arr.len());
            if idx >= arr.len() {
                arr.resize(idx + 1, Value::Null);
            }
            &mut arr[idx]
        }
        Value::Object(map) => map
            .entry(step.as_key().into_owned())
            .or_insert(Value::Null),
        // Not reachable: `container` was replaced by a container above.
        scalar => scalar,
    }
}
