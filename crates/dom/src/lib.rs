//! Copy-on-write DOM values, patches and hierarchical diff.
//!
//! A [`Value`] is an immutable-by-default tree of scalars, arrays, objects,
//! named nodes and opaque payloads. Clones share storage until written.
//! A [`Patch`] is a list of RFC 6902 style operations that can be applied,
//! inverted, and stored as a DOM value itself. [`patch_diff`] computes the
//! patch (and its inverse) between two trees.
//!
//! # Example
//!
//! ```
//! use dom::json::from_json;
//! use dom::patch_diff::generate_hierarchical_delta_patch;
//! use serde_json::json;
//!
//! let before = from_json(&json!({"title": "draft", "tags": ["a"]})).unwrap();
//! let after = from_json(&json!({"title": "final", "tags": ["a", "b"]})).unwrap();
//!
//! let info = generate_hierarchical_delta_patch(&before, &after, &Default::default());
//! assert_eq!(info.forward_patches.len(), 2);
//!
//! let patched = info.forward_patches.apply(before.clone()).unwrap();
//! assert_eq!(patched, after);
//! ```

pub mod json;
pub mod patch;
pub mod patch_diff;
pub mod value;
pub mod visitor;

pub use dom_path::{Name, Path, PathEntry, PathError};
pub use patch::{
    OperationFailure, Patch, PatchError, PatchFailure, PatchOperation, PatchOperationType,
    PatchParseError, PatchStrategy, PatchingState,
};
pub use patch_diff::{generate_hierarchical_delta_patch, DeltaPatchGenerationParameters, PatchInfo};
pub use value::{Array, DomString, Node, Object, OpaqueValue, Type, Value};
pub use visitor::{Lifetime, ValueWriter, Visitor, VisitorError};
