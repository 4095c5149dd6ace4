//! Hierarchical diff: generate the patch that turns one DOM tree into
//! another, together with its inverse.
//!
//! The diff walks both trees in parallel. Containers of the same kind are
//! compared member by member and only differing leaves are replaced; arrays
//! and node children are compared by position (no longest-common-subsequence
//! search), so an insertion near the front rewrites the tail.
//!
//! # Example
//!
//! ```
//! use dom::json::from_json;
//! use dom::patch_diff::{generate_hierarchical_delta_patch, DeltaPatchGenerationParameters};
//! use serde_json::json;
//!
//! let before = from_json(&json!({"a": 1, "b": [1, 2]})).unwrap();
//! let after = from_json(&json!({"a": 2, "b": [1]})).unwrap();
//!
//! let info = generate_hierarchical_delta_patch(&before, &after, &Default::default());
//! assert_eq!(info.forward_patches.apply(before.clone()).unwrap(), after);
//! assert_eq!(info.inverse_patches.apply(after).unwrap(), before);
//! ```

use dom_path::{Path, PathEntry};
use tracing::trace;

use crate::patch::{Patch, PatchOperation};
use crate::value::{object, ObjectEntry, Value};

/// Tuning for [`generate_hierarchical_delta_patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaPatchGenerationParameters {
    /// When more than this many members of one container differ, the
    /// container is replaced as a whole instead of patched member by member.
    pub replace_threshold: usize,
}

impl DeltaPatchGenerationParameters {
    /// Always patch member by member.
    pub const NO_REPLACE: usize = usize::MAX;
    /// Replace any container that differs at all.
    pub const ALWAYS_FULL_REPLACE: usize = 0;

    pub fn with_replace_threshold(replace_threshold: usize) -> Self {
        Self { replace_threshold }
    }
}

impl Default for DeltaPatchGenerationParameters {
    fn default() -> Self {
        Self {
            replace_threshold: Self::NO_REPLACE,
        }
    }
}

/// A forward patch and the patch that undoes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchInfo {
    pub forward_patches: Patch,
    pub inverse_patches: Patch,
}

/// Compute the patch turning `before` into `after`.
///
/// Applying `forward_patches` to `before` yields a value equal to `after`,
/// and applying `inverse_patches` to that result yields a value equal to
/// `before`. Equal trees produce empty patches.
pub fn generate_hierarchical_delta_patch(
    before: &Value,
    after: &Value,
    params: &DeltaPatchGenerationParameters,
) -> PatchInfo {
    let mut generator = DeltaGenerator {
        params,
        path: Path::new(),
        info: PatchInfo::default(),
    };
    generator.diff(before, after);
    generator.info
}

// ── Generator ─────────────────────────────────────────────────────────────

struct DeltaGenerator<'p> {
    params: &'p DeltaPatchGenerationParameters,
    path: Path,
    info: PatchInfo,
}

impl DeltaGenerator<'_> {
    fn add_patch(&mut self, forward: PatchOperation, inverse: PatchOperation) {
        self.info.forward_patches.push_back(forward);
        self.info.inverse_patches.push_front(inverse);
    }

    fn replace(&mut self, before: &Value, after: &Value) {
        self.add_patch(
            PatchOperation::replace(self.path.clone(), after.clone()),
            PatchOperation::replace(self.path.clone(), before.clone()),
        );
    }

    fn diff(&mut self, before: &Value, after: &Value) {
        if before == after {
            return;
        }
        match (before, after) {
            (Value::Object(b), Value::Object(a)) => {
                if self.has_repeated_keys(b, a) || self.exceeds_threshold(entry_changes(b, a)) {
                    return self.replace(before, after);
                }
                self.diff_entries(b, a);
            }
            (Value::Array(b), Value::Array(a)) => {
                if self.exceeds_threshold(item_changes(b, a)) {
                    return self.replace(before, after);
                }
                self.diff_items(b, a);
            }
            (Value::Node(b), Value::Node(a)) if b.name() == a.name() => {
                if self.has_repeated_keys(b.properties(), a.properties()) {
                    return self.replace(before, after);
                }
                let changes = entry_changes(b.properties(), a.properties())
                    .saturating_add(item_changes(b.children(), a.children()));
                if self.exceeds_threshold(changes) {
                    return self.replace(before, after);
                }
                self.diff_entries(b.properties(), a.properties());
                self.diff_items(b.children(), a.children());
            }
            _ => self.replace(before, after),
        }
    }

    fn exceeds_threshold(&self, changes: usize) -> bool {
        let exceeded = changes > self.params.replace_threshold;
        if exceeded {
            trace!(
                path = %self.path,
                changes,
                threshold = self.params.replace_threshold,
                "replacing whole container"
            );
        }
        exceeded
    }

    /// Keyed operations address only the first of several same-named
    /// entries, so such containers cannot be patched member by member.
    fn has_repeated_keys(&self, before: &[ObjectEntry], after: &[ObjectEntry]) -> bool {
        let repeated = object::has_duplicate_keys(before) || object::has_duplicate_keys(after);
        if repeated {
            trace!(path = %self.path, "repeated keys, replacing whole container");
        }
        repeated
    }

    fn diff_entries(&mut self, before: &[ObjectEntry], after: &[ObjectEntry]) {
        for (key, a) in after {
            let entry = PathEntry::Key(key.clone());
            match object::position_name(before, key) {
                Some(pos) => {
                    self.path.push(entry);
                    self.diff(&before[pos].1, a);
                    self.path.pop();
                }
                None => {
                    let path = self.path.child(entry);
                    self.add_patch(
                        PatchOperation::add(path.clone(), a.clone()),
                        PatchOperation::remove(path),
                    );
                }
            }
        }
        for (key, b) in before {
            if object::position_name(after, key).is_none() {
                let path = self.path.child(key);
                self.add_patch(
                    PatchOperation::remove(path.clone()),
                    PatchOperation::add(path, b.clone()),
                );
            }
        }
    }

    fn diff_items(&mut self, before: &[Value], after: &[Value]) {
        let common = before.len().min(after.len());
        for (index, (b, a)) in before.iter().zip(after).enumerate() {
            self.path.push(index);
            self.diff(b, a);
            self.path.pop();
        }
        for (index, a) in after.iter().enumerate().skip(common) {
            self.add_patch(
                PatchOperation::add(self.path.child(PathEntry::EndOfArray), a.clone()),
                PatchOperation::remove(self.path.child(index)),
            );
        }
        for (index, b) in before.iter().enumerate().skip(common).rev() {
            self.add_patch(
                PatchOperation::remove(self.path.child(index)),
                PatchOperation::add(self.path.child(PathEntry::EndOfArray), b.clone()),
            );
        }
    }
}

/// Members added, removed, or changed between two entry lists.
fn entry_changes(before: &[ObjectEntry], after: &[ObjectEntry]) -> usize {
    let changed_or_added = after
        .iter()
        .filter(|(key, a)| match object::position_name(before, key) {
            Some(pos) => before[pos].1 != *a,
            None => true,
        })
        .count();
    let removed = before
        .iter()
        .filter(|(key, _)| object::position_name(after, key).is_none())
        .count();
    changed_or_added + removed
}

/// Positions that differ, plus the length difference.
fn item_changes(before: &[Value], after: &[Value]) -> usize {
    let changed = before.iter().zip(after).filter(|(b, a)| b != a).count();
    changed + before.len().abs_diff(after.len())
}
