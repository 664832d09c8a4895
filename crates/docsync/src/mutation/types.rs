//! The serializable form of a structural edit.

use docsync_pointer::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::apply;

/// One structural edit issued by a form surface.
///
/// Encoded as JSON tagged by `op`:
///
/// ```
/// use docsync::Mutation;
/// use serde_json::json;
///
/// let m: Mutation = serde_json::from_value(json!({
///     "op": "update", "path": ["info", "title"], "value": "Petstore"
/// })).unwrap();
/// assert_eq!(m.apply(&json!({})), json!({"info": {"title": "Petstore"}}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Update {
        path: Path,
        value: Value,
    },
    AddItem {
        path: Path,
        item: Value,
    },
    RemoveItem {
        path: Path,
    },
    RenameKey {
        path: Path,
        old_key: String,
        new_key: String,
    },
    ToggleRequired {
        path: Path,
        key: String,
        required: bool,
    },
}

impl Mutation {
    /// Apply to a snapshot, producing the next snapshot.
    pub fn apply(&self, doc: &Value) -> Value {
        match self {
            Mutation::Update { path, value } => apply::update(doc, path, value.clone()),
            Mutation::AddItem { path, item } => apply::add_item(doc, path, item.clone()),
            Mutation::RemoveItem { path } => apply::remove_item(doc, path),
            Mutation::RenameKey {
                path,
                old_key,
                new_key,
            } => apply::rename_key(doc, path, old_key, new_key),
            Mutation::ToggleRequired {
                path,
                key,
                required,
            } => apply::toggle_required(doc, path, key, *required),
        }
    }

    /// The path the operation addresses. For `rename_key` and
    /// `toggle_required` this is the containing mapping or schema.
    pub fn path(&self) -> &Path {
        match self {
            Mutation::Update { path, .. }
            | Mutation::AddItem { path, .. }
            | Mutation::RemoveItem { path }
            | Mutation::RenameKey { path, .. }
            | Mutation::ToggleRequired { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Update { .. } => "update",
            Mutation::AddItem { .. } => "add_item",
            Mutation::RemoveItem { .. } => "remove_item",
            Mutation::RenameKey { .. } => "rename_key",
            Mutation::ToggleRequired { .. } => "toggle_required",
        }
    }
}
