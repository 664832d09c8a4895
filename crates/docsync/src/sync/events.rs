use serde_json::Value;
use std::sync::Arc;

use crate::codec::{Format, ParseError};

/// Which editing surface a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Raw text edits, parsed into the document.
    Text,
    /// Structural edits, serialized into the text.
    Tree,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The controller wrote new text for the text surface to display.
    TextPublished {
        text: String,
        format: Format,
        origin: ChangeOrigin,
    },
    DocumentReplaced {
        document: Arc<Value>,
        origin: ChangeOrigin,
    },
    /// The last text edit did not parse; the previous document is kept.
    ParseFailed { error: ParseError },
    /// The document could not be written in the current format; the
    /// previous text is kept.
    SerializeFailed { message: String },
}
