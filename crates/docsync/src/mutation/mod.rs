//! Structural edits on immutable document snapshots.
//!
//! # Operations
//!
//! `update`, `add_item`, `remove_item`, `rename_key`, `toggle_required`.
//!
//! Every operation takes `&Value` and returns a new `Value`, cloning the
//! input exactly once before writing. None of them fail: a path that cannot
//! be honoured degrades to a no-op (or, for `update`/`add_item`, creates what
//! is missing). This favours keeping the editor alive over rejecting edits.
//!
//! Removing a sequence element renumbers the elements after it. Paths held
//! elsewhere into that sequence may address a different element afterwards;
//! recompute them from the new snapshot.

pub mod apply;
pub mod types;

pub use apply::{add_item, remove_item, rename_key, toggle_required, update, REQUIRED_KEY};
pub use types::Mutation;
