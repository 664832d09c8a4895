//! Text/tree synchronization and structural editing for API description
//! documents written in JSON or YAML.
//!
//! - [`codec`] parses text into a document and writes it back.
//! - [`mutation`] holds the pure structural edits a form surface issues.
//! - [`sync`] keeps the raw text and the document consistent while both are
//!   edited.
//! - [`view`] projects a document into the tree a form renders, expanding
//!   internal references.
//!
//! Paths and reference resolution live in [`pointer`].
//!
//! # Example
//!
//! ```
//! use docsync::{Mutation, SyncConfig, SyncController};
//! use docsync::pointer::Step;
//! use serde_json::json;
//!
//! let config = SyncConfig { json_indent: 0, ..SyncConfig::default() };
//! let mut sync = SyncController::new(r#"{"a":{"b":1}}"#, config).unwrap();
//! sync.apply(&Mutation::Update {
//!     path: vec![Step::key("a"), Step::key("b")],
//!     value: json!(2),
//! });
//! assert_eq!(sync.text(), r#"{"a":{"b":2}}"#);
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod mutation;
pub mod sample;
pub mod sync;
pub mod view;

pub use docsync_pointer as pointer;

pub use codec::{Format, ParseError, SerializeError, SerializeOptions};
pub use config::{ConfigError, SyncConfig};
pub use mutation::Mutation;
pub use sync::{Authority, ChangeOrigin, SyncController, SyncEvent, SyncState, TextChange};
pub use view::{project, FormKind, FormNode};
