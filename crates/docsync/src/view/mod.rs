//! Projection of a document into the tree a form surface renders.
//!
//! Each [`FormNode`] carries the path a mutation must use to edit it. Below a
//! reference site the paths are those of the referenced location, so editing
//! through a `$ref` edits the referenced node, never the `$ref` site.

use docsync_pointer::{ref_target, Path, Resolution, ResolutionPass, Step};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FormNode {
    /// Where to point mutations that edit this node.
    pub edit_path: Path,
    pub kind: FormKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    Scalar(Value),
    Mapping(Vec<(String, FormNode)>),
    Sequence(Vec<FormNode>),
    /// A resolved `$ref` site. `target` is projected at the referenced
    /// location.
    Reference {
        reference: String,
        target: Box<FormNode>,
    },
    /// A `$ref` that is external, malformed or names a missing location.
    InvalidReference { reference: String },
    /// A `$ref` already being expanded further up this branch.
    Circular {
        reference: String,
        chain: Vec<String>,
    },
}

impl FormNode {
    /// Child of a mapping node by key, or of a sequence node by index.
    /// Reference nodes are looked through.
    pub fn child(&self, step: &Step) -> Option<&FormNode> {
        match &self.kind {
            FormKind::Mapping(entries) => entries
                .iter()
                .find(|(key, _)| *key == *step.as_key())
                .map(|(_, node)| node),
            FormKind::Sequence(items) => items.get(step.as_index()?),
            FormKind::Reference { target, .. } => target.child(step),
            _ => None,
        }
    }

    /// Follow a path of steps through [`child`](Self::child).
    pub fn find(&self, path: &[Step]) -> Option<&FormNode> {
        path.iter().try_fold(self, |node, step| node.child(step))
    }
}

/// Project `doc` for rendering.
///
/// References are expanded in place. The visited set lives for this call
/// only and tracks the chain of references above the current node, so two
/// sibling references to the same schema both expand.
pub fn project(doc: &Value) -> FormNode {
    let mut pass = ResolutionPass::new();
    project_node(doc, doc, Vec::new(), &mut pass)
}

fn project_node(doc: &Value, node: &Value, edit_path: Path, pass: &mut ResolutionPass) -> FormNode {
    if let Some(reference) = ref_target(node) {
        let kind = match pass.enter(doc, reference) {
            Resolution::Found {
                node: target,
                edit_path: target_path,
            } => {
                let target = project_node(doc, target, target_path, pass);
                pass.leave(reference);
                FormKind::Reference {
                    reference: reference.to_string(),
                    target: Box::new(target),
                }
            }
            Resolution::NotFound => FormKind::InvalidReference {
                reference: reference.to_string(),
            },
            Resolution::Circular { chain } => FormKind::Circular {
                reference: reference.to_string(),
                chain,
            },
        };
        return FormNode { edit_path, kind };
    }

    let kind = match node {
        Value::Object(map) => FormKind::Mapping(
            map.iter()
                .map(|(key, value)| {
                    let mut path = edit_path.clone();
                    path.push(Step::key(key.as_str()));
                    (key.clone(), project_node(doc, value, path, pass))
                })
                .collect(),
        ),
        Value::Array(items) => FormKind::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    let mut path = edit_path.clone();
                    path.push(Step::index(idx));
                    project_node(doc, value, path, pass)
                })
                .collect(),
        ),
        scalar => FormKind::Scalar(scalar.clone()),
    };
    FormNode { edit_path, kind }
}
