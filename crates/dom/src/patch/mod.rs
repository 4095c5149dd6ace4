//! Patches: editing operations over DOM trees.
//!
//! # Operations
//!
//! The six operations of RFC 6902 are supported over DOM values:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`. Keys address object
//! members and node properties; indices address array elements and node
//! children.
//!
//! A [`Patch`] applies operations in order against a copy-on-write working
//! tree, reports each result to a [`PatchStrategy`], and can produce its own
//! inverse. Patches round-trip through DOM values with
//! [`Patch::get_dom_representation`] and
//! [`Patch::create_from_dom_representation`].

pub mod apply;
pub mod codec;
pub mod sequence;
pub mod strategy;
pub mod types;

pub use apply::{lookup_path, resolve, ExistenceCheckFlags, PathContext};
pub use sequence::{OperationFailure, Patch, PatchFailure};
pub use strategy::{HaltOnFailure, IgnoreFailureAndContinue, PatchStrategy, PatchingState};
pub use types::{PatchError, PatchOperation, PatchOperationType, PatchParseError};
