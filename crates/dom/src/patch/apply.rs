//! Single-operation application and inversion.
//!
//! Every operation either succeeds completely or leaves the tree as it was.
//! Paths are resolved with [`lookup_path`], which checks the whole route
//! before anything is written.

use std::ops::BitOr;

use dom_path::{Path, PathEntry};

use super::sequence::Patch;
use super::types::{PatchError, PatchOperation};
use crate::value::{Type, Value};

// ── Path lookup ───────────────────────────────────────────────────────────

/// What [`lookup_path`] requires of the final path entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExistenceCheckFlags(u8);

impl ExistenceCheckFlags {
    /// Only the parent must exist.
    pub const DEFAULT: Self = Self(0);
    /// The final target must exist as well.
    pub const VERIFY_FULL_PATH: Self = Self(1);
    /// The end-of-array sentinel may be the final entry.
    pub const ALLOW_END_OF_ARRAY: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ExistenceCheckFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The container holding a path's final entry.
#[derive(Debug)]
pub struct PathContext<'a> {
    pub parent: &'a mut Value,
    pub entry: PathEntry,
}

/// Walk to the parent of the last entry of `path`.
///
/// Intermediate entries must all exist. The final entry is checked against
/// the parent kind: keys need an object or node, indices an array, node or
/// object (where they read as keys). Insertion indices may equal the length
/// unless [`ExistenceCheckFlags::VERIFY_FULL_PATH`] is set.
///
/// Shared storage along the route is forked, so the returned parent can be
/// written without affecting other clones.
///
/// # Errors
///
/// [`PatchError::RootNotAllowed`] for the empty path, otherwise an error
/// naming the first entry that cannot be resolved.
pub fn lookup_path<'a>(
    root: &'a mut Value,
    path: &Path,
    flags: ExistenceCheckFlags,
) -> Result<PathContext<'a>, PatchError> {
    let Some((last, route)) = path.entries().split_last() else {
        return Err(PatchError::RootNotAllowed);
    };

    let mut current = root;
    let mut walked = Path::new();
    for entry in route {
        if current.find_child(entry).is_none() {
            return Err(missing_child(current, &walked, entry));
        }
        walked.push(entry.clone());
        current = current
            .find_mutable_child(entry)
            .ok_or_else(|| PatchError::not_found(&walked))?;
    }

    check_final_entry(current, &walked, last, flags)?;
    Ok(PathContext {
        parent: current,
        entry: last.clone(),
    })
}

/// Classify why `entry` could not be found under `container`.
fn missing_child(container: &Value, walked: &Path, entry: &PathEntry) -> PatchError {
    let kind = container.get_type();
    let full = || walked.child(entry.clone()).to_string();
    match (kind, entry) {
        (Type::Object, _) | (Type::Node, PathEntry::Key(_)) => PatchError::NotFound { path: full() },
        (Type::Array | Type::Node, PathEntry::Index(_)) => PatchError::IndexOutOfRange { path: full() },
        (Type::Array | Type::Node, PathEntry::EndOfArray) => {
            PatchError::EndOfArrayNotAllowed { path: full() }
        }
        _ => PatchError::InvalidTarget {
            path: walked.to_string(),
            kind,
        },
    }
}

fn check_final_entry(
    parent: &Value,
    walked: &Path,
    entry: &PathEntry,
    flags: ExistenceCheckFlags,
) -> Result<(), PatchError> {
    let verify = flags.contains(ExistenceCheckFlags::VERIFY_FULL_PATH);
    let full = || walked.child(entry.clone()).to_string();
    match (parent.get_type(), entry) {
        (Type::Object, _) | (Type::Node, PathEntry::Key(_)) => {
            if verify && parent.find_child(entry).is_none() {
                return Err(PatchError::NotFound { path: full() });
            }
            Ok(())
        }
        (Type::Array | Type::Node, PathEntry::Index(i)) => {
            let len = parent.array_len();
            let in_range = if verify { *i < len } else { *i <= len };
            if !in_range {
                return Err(PatchError::IndexOutOfRange { path: full() });
            }
            Ok(())
        }
        (Type::Array | Type::Node, PathEntry::EndOfArray) => {
            if verify || !flags.contains(ExistenceCheckFlags::ALLOW_END_OF_ARRAY) {
                return Err(PatchError::EndOfArrayNotAllowed { path: full() });
            }
            Ok(())
        }
        (kind, _) => Err(PatchError::InvalidTarget {
            path: walked.to_string(),
            kind,
        }),
    }
}

/// Immutable lookup of an existing value.
pub fn resolve<'a>(root: &'a Value, path: &Path) -> Result<&'a Value, PatchError> {
    root.find_child_path(path)
        .ok_or_else(|| PatchError::not_found(path))
}

// ── Primitive edits ───────────────────────────────────────────────────────

/// Insert-or-overwrite. Returns the overwritten value, if any.
fn add(root: &mut Value, path: &Path, value: Value) -> Result<Option<Value>, PatchError> {
    if path.is_empty() {
        return Ok(Some(std::mem::replace(root, value)));
    }
    let ctx = lookup_path(root, path, ExistenceCheckFlags::ALLOW_END_OF_ARRAY)?;
    let parent = ctx.parent;
    let old = match ctx.entry {
        PathEntry::Key(key) => parent.insert_member(key, value),
        entry if parent.is_object() => parent.insert_member(entry.to_key(), value),
        PathEntry::Index(i) => {
            parent.array_insert(i, value);
            None
        }
        PathEntry::EndOfArray => {
            parent.array_push_back(value);
            None
        }
    };
    Ok(old)
}

fn remove(root: &mut Value, path: &Path) -> Result<Value, PatchError> {
    let ctx = lookup_path(root, path, ExistenceCheckFlags::VERIFY_FULL_PATH)?;
    let parent = ctx.parent;
    let removed = match &ctx.entry {
        PathEntry::Key(key) => parent.remove_member(key),
        entry if parent.is_object() => parent.remove_member(&entry.to_key()),
        PathEntry::Index(i) => Some(parent.array_erase(*i)),
        PathEntry::EndOfArray => None,
    };
    removed.ok_or_else(|| PatchError::not_found(path))
}

fn replace(root: &mut Value, path: &Path, value: Value) -> Result<Value, PatchError> {
    if path.is_empty() {
        return Ok(std::mem::replace(root, value));
    }
    let ctx = lookup_path(root, path, ExistenceCheckFlags::VERIFY_FULL_PATH)?;
    let slot = ctx
        .parent
        .find_mutable_child(&ctx.entry)
        .ok_or_else(|| PatchError::not_found(path))?;
    Ok(std::mem::replace(slot, value))
}

fn move_value(root: &mut Value, from: &Path, path: &Path) -> Result<(), PatchError> {
    if from == path {
        resolve(root, from)?;
        return Ok(());
    }
    if from.is_strict_prefix_of(path) {
        return Err(PatchError::MoveIntoChild {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    // Remove and re-add on a working copy so a failed add keeps the source
    let mut working = root.clone();
    let value = remove(&mut working, from)?;
    add(&mut working, path, value)?;
    *root = working;
    Ok(())
}

fn test(root: &Value, path: &Path, expected: &Value) -> Result<(), PatchError> {
    if resolve(root, path)? != expected {
        return Err(PatchError::TestFailed {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// The concrete location an insertion at `path` lands on, and the value it
/// overwrites.
///
/// The end-of-array sentinel resolves to the current length.
fn resolve_destination(state: &Value, path: &Path) -> Result<(Path, Option<Value>), PatchError> {
    let Some(entry) = path.last() else {
        return Ok((Path::new(), Some(state.clone())));
    };
    let parent_path = path.parent().map_err(|_| PatchError::RootNotAllowed)?;
    let parent = resolve(state, &parent_path)?;
    if parent.is_object() || entry.is_key() {
        return Ok((path.clone(), parent.find_child(entry).cloned()));
    }
    match entry {
        PathEntry::EndOfArray => {
            let len = parent.as_array().map_or(0, Vec::len);
            Ok((parent_path / len, None))
        }
        _ => Ok((path.clone(), None)),
    }
}

// ── Public API ────────────────────────────────────────────────────────────

impl PatchOperation {
    /// Apply this operation to `root`.
    ///
    /// On error `root` is unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use dom::{Path, PatchOperation, Value};
    ///
    /// let mut doc = Value::from(vec![Value::from(1), Value::from(2)]);
    /// let op = PatchOperation::add(Path::parse("/-").unwrap(), 3);
    /// op.apply_in_place(&mut doc).unwrap();
    /// assert_eq!(doc.array_len(), 3);
    /// ```
    pub fn apply_in_place(&self, root: &mut Value) -> Result<(), PatchError> {
        match self {
            PatchOperation::Add { path, value } => add(root, path, value.clone()).map(drop),
            PatchOperation::Remove { path } => remove(root, path).map(drop),
            PatchOperation::Replace { path, value } => {
                replace(root, path, value.clone()).map(drop)
            }
            PatchOperation::Copy { path, from } => {
                let value = resolve(root, from)?.clone();
                add(root, path, value).map(drop)
            }
            PatchOperation::Move { path, from } => move_value(root, from, path),
            PatchOperation::Test { path, value } => test(root, path, value),
        }
    }

    /// Apply this operation to `root` and return the result.
    ///
    /// Pass a clone to keep the original; unmodified subtrees stay shared.
    pub fn apply(&self, mut root: Value) -> Result<Value, PatchError> {
        self.apply_in_place(&mut root)?;
        Ok(root)
    }

    /// The patch that undoes this operation when applied to the result of
    /// applying it to `before`.
    ///
    /// # Errors
    ///
    /// Whatever applying the operation to `before` would return.
    ///
    /// # Example
    ///
    /// ```
    /// use dom::{Path, PatchOperation, Value};
    ///
    /// let before = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
    /// let op = PatchOperation::move_(Path::parse("/0").unwrap(), Path::parse("/2").unwrap());
    ///
    /// let after = op.apply(before.clone()).unwrap();
    /// let inverse = op.get_inverse(&before).unwrap();
    /// assert_eq!(inverse.apply(after).unwrap(), before);
    /// ```
    pub fn get_inverse(&self, before: &Value) -> Result<Patch, PatchError> {
        self.apply(before.clone())?;
        let ops = match self {
            PatchOperation::Add { path, .. } | PatchOperation::Copy { path, .. } => {
                let (dest, old) = resolve_destination(before, path)?;
                match old {
                    Some(old) => vec![PatchOperation::replace(dest, old)],
                    None => vec![PatchOperation::remove(dest)],
                }
            }
            PatchOperation::Remove { path } => {
                vec![PatchOperation::add(path.clone(), resolve(before, path)?.clone())]
            }
            PatchOperation::Replace { path, .. } => {
                vec![PatchOperation::replace(path.clone(), resolve(before, path)?.clone())]
            }
            PatchOperation::Move { path, from } => invert_move(before, from, path)?,
            PatchOperation::Test { .. } => Vec::new(),
        };
        Ok(Patch::from(ops))
    }
}

fn invert_move(before: &Value, from: &Path, path: &Path) -> Result<Vec<PatchOperation>, PatchError> {
    if from == path {
        return Ok(Vec::new());
    }
    let mut detached = before.clone();
    let value = remove(&mut detached, from)?;
    let (dest, old) = resolve_destination(&detached, path)?;
    let ops = match old {
        Some(old) => vec![
            PatchOperation::replace(dest, old),
            PatchOperation::add(from.clone(), value),
        ],
        None if dest.is_strict_prefix_of(from) => vec![
            PatchOperation::remove(dest),
            PatchOperation::add(from.clone(), value),
        ],
        None => vec![PatchOperation::move_(dest, from.clone())],
    };
    Ok(ops)
}
