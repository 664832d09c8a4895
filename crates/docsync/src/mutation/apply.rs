//! Mutation operations.

use docsync_pointer::{format_path, get, get_mut, set_in_place, split_parent, Step};
use serde_json::Value;
use tracing::debug;

use crate::codec::kind_name;

/// Field holding the required-set of an object schema.
pub const REQUIRED_KEY: &str = "required";

// ── Update ────────────────────────────────────────────────────────────────

/// Overwrite the value at `path`, creating intermediate containers.
///
/// An index too far past the end of a sequence leaves the document as is.
pub fn update(doc: &Value, path: &[Step], value: Value) -> Value {
    let mut next = doc.clone();
    if !set_in_place(&mut next, path, value) {
        debug!(path = %format_path(path), "update index beyond sequence end ignored");
    }
    next
}

// ── AddItem ───────────────────────────────────────────────────────────────

/// Add `item` to the collection at `collection_path`.
///
/// - Sequence: `item` is appended.
/// - Mapping: `item` must be a single-entry mapping whose entry is merged in,
///   replacing a same-named key. With several entries only the first is used;
///   an empty or non-mapping payload is ignored.
/// - Absent (or scalar): the location becomes `item` if it is a sequence,
///   otherwise `[item]`.
pub fn add_item(doc: &Value, collection_path: &[Step], item: Value) -> Value {
    let mut next = doc.clone();
    match get_mut(&mut next, collection_path) {
        Some(Value::Array(items)) => items.push(item),
        Some(Value::Object(map)) => match item {
            Value::Object(entries) => {
                if entries.len() > 1 {
                    debug!(
                        path = %format_path(collection_path),
                        entries = entries.len(),
                        "add_item payload has several entries; merging the first"
                    );
                }
                match entries.into_iter().next() {
                    Some((key, value)) => {
                        map.insert(key, value);
                    }
                    None => {
                        debug!(path = %format_path(collection_path), "add_item payload is empty")
                    }
                }
            }
            _ => debug!(
                path = %format_path(collection_path),
                "add_item on a mapping needs a single-entry mapping payload"
            ),
        },
        _ => {
            let created = match item {
                Value::Array(_) => item,
                other => Value::Array(vec![other]),
            };
            if !set_in_place(&mut next, collection_path, created) {
                debug!(
                    path = %format_path(collection_path),
                    "add_item index beyond sequence end ignored"
                );
            }
        }
    }
    next
}

// ── RemoveItem ────────────────────────────────────────────────────────────

/// Remove the element or entry at `path`.
///
/// Removing from a sequence shifts later elements down by one. Missing
/// parents, out-of-range indices and the root path are no-ops.
pub fn remove_item(doc: &Value, path: &[Step]) -> Value {
    let mut next = doc.clone();
    let Some((parent_path, last)) = split_parent(path) else {
        debug!("remove_item on the document root ignored");
        return next;
    };
    match get_mut(&mut next, parent_path) {
        Some(Value::Array(items)) => match last.as_index().filter(|idx| *idx < items.len()) {
            Some(idx) => {
                items.remove(idx);
            }
            None => debug!(path = %format_path(path), "remove_item index out of range"),
        },
        Some(Value::Object(map)) => {
            map.shift_remove(&*last.as_key());
        }
        _ => debug!(path = %format_path(path), "remove_item parent missing"),
    }
    next
}

// ── RenameKey ─────────────────────────────────────────────────────────────

/// Move the value under `old_key` to `new_key` in the mapping at
/// `parent_path`, replacing any existing `new_key` entry.
///
/// The renamed entry keeps the position `old_key` had.
pub fn rename_key(doc: &Value, parent_path: &[Step], old_key: &str, new_key: &str) -> Value {
    let mut next = doc.clone();
    if old_key == new_key {
        return next;
    }
    if let Some(Value::Object(map)) = get_mut(&mut next, parent_path) {
        if map.contains_key(old_key) {
            let entries = std::mem::take(map);
            for (key, value) in entries {
                if key == old_key {
                    map.insert(new_key.to_string(), value);
                } else if key != new_key {
                    map.insert(key, value);
                }
            }
        }
    }
    next
}

// ── ToggleRequired ────────────────────────────────────────────────────────

/// Add `property_key` to, or remove it from, the required-set of the schema
/// at `schema_path`.
///
/// Adding twice is the same as adding once. Removing the last member deletes
/// the `required` field. Removing from an absent set creates nothing. A
/// `schema_path` holding anything but a mapping is left alone.
pub fn toggle_required(
    doc: &Value,
    schema_path: &[Step],
    property_key: &str,
    make_required: bool,
) -> Value {
    let mut next = doc.clone();
    let is_member = |item: &Value| item.as_str() == Some(property_key);

    if let Some(schema) = get(&next, schema_path).filter(|schema| !schema.is_object()) {
        debug!(
            path = %format_path(schema_path),
            found = kind_name(schema),
            "toggle_required target is not a mapping"
        );
        return next;
    }

    if make_required {
        let present = get(&next, schema_path)
            .and_then(|schema| schema.get(REQUIRED_KEY))
            .and_then(Value::as_array)
            .map(|items| items.iter().any(is_member));
        match present {
            Some(true) => {}
            Some(false) => {
                if let Some(Value::Array(items)) = get_mut(&mut next, schema_path)
                    .and_then(|schema| schema.get_mut(REQUIRED_KEY))
                {
                    items.push(Value::String(property_key.to_string()));
                }
            }
            None => {
                let mut required_path = schema_path.to_vec();
                required_path.push(Step::key(REQUIRED_KEY));
                let required = Value::Array(vec![Value::String(property_key.to_string())]);
                if !set_in_place(&mut next, &required_path, required) {
                    debug!(
                        path = %format_path(schema_path),
                        "toggle_required index beyond sequence end ignored"
                    );
                }
            }
        }
        return next;
    }

    if let Some(Value::Object(schema)) = get_mut(&mut next, schema_path) {
        let emptied = match schema.get_mut(REQUIRED_KEY) {
            Some(Value::Array(items)) => {
                items.retain(|item| !is_member(item));
                items.is_empty()
            }
            _ => false,
        };
        if emptied {
            schema.shift_remove(REQUIRED_KEY);
        }
    }
    next
}
