//! Core logic of the command line tools.
//!
//! - `docsync-edit`: apply one structural edit to a document
//! - `docsync-resolve`: print the node an internal reference names
//!
//! Both read a JSON or YAML document and answer in the same syntax.

use docsync_pointer::{parse_reference, resolve_chain, ReferenceError, Resolution};
use thiserror::Error;

use crate::codec::{self, ParseError, SerializeError};
use crate::config::SyncConfig;
use crate::mutation::Mutation;
use crate::sync::SyncController;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid document: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error("invalid mutation: {0}")]
    Mutation(serde_json::Error),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error("reference not found: {0}")]
    NotFound(String),
    #[error("circular reference: {}", .0.join(" -> "))]
    Circular(Vec<String>),
}

/// Apply the JSON-encoded `mutation` to `document` and return the new text.
pub fn apply_mutation(
    document: &str,
    mutation: &str,
    config: SyncConfig,
) -> Result<String, CliError> {
    let mutation: Mutation = serde_json::from_str(mutation).map_err(CliError::Mutation)?;
    let mut controller = SyncController::new(document, config)?;
    controller.apply(&mutation);
    Ok(controller.text().to_string())
}

/// Resolve `reference` in `document`, following `$ref` hops, and return the
/// target serialized in the document's syntax.
pub fn resolve_reference(
    document: &str,
    reference: &str,
    config: &SyncConfig,
) -> Result<String, CliError> {
    parse_reference(reference)?;
    let (doc, format) = codec::parse(document)?;
    match resolve_chain(&doc, reference) {
        Resolution::Found { node, .. } => {
            Ok(codec::serialize(node, format, &config.serialize_options())?)
        }
        Resolution::NotFound => Err(CliError::NotFound(reference.to_string())),
        Resolution::Circular { chain } => Err(CliError::Circular(chain)),
    }
}
