//! Ordered operation lists.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Index, IndexMut};

use thiserror::Error;
use tracing::{debug, trace};

use super::strategy::{HaltOnFailure, PatchStrategy, PatchingState};
use super::types::{PatchError, PatchOperation, PatchOperationType};
use crate::value::Value;

/// One failed operation of a patch.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("operation {index} ({op}) failed: {error}")]
pub struct OperationFailure {
    pub index: usize,
    pub op: PatchOperationType,
    #[source]
    pub error: PatchError,
}

/// Every failure of one patch application.
///
/// `value` is the tree as the strategy left it: the untouched input when
/// the patch halted, the partially patched tree when it continued.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchFailure {
    pub failures: Vec<OperationFailure>,
    pub value: Value,
}

impl PatchFailure {
    /// The first failing operation.
    pub fn first(&self) -> Option<&OperationFailure> {
        self.failures.first()
    }
}

impl fmt::Display for PatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.split_first() {
            None => f.write_str("patch failed"),
            Some((first, [])) => write!(f, "{first}"),
            Some((first, rest)) => write!(f, "{first} (and {} more)", rest.len()),
        }
    }
}

impl std::error::Error for PatchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first().map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}

/// An ordered list of [`PatchOperation`]s applied as one unit.
///
/// # Example
///
/// ```
/// use dom::{Patch, PatchOperation, Path, Value};
///
/// let patch: Patch = vec![
///     PatchOperation::add(Path::parse("/a").unwrap(), 1),
///     PatchOperation::test(Path::parse("/a").unwrap(), 1),
/// ]
/// .into();
///
/// let doc = patch.apply(Value::from_type(dom::Type::Object)).unwrap();
/// assert_eq!(doc["a"].as_i64(), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    operations: VecDeque<PatchOperation>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn push_back(&mut self, op: PatchOperation) {
        self.operations.push_back(op);
    }

    pub fn push_front(&mut self, op: PatchOperation) {
        self.operations.push_front(op);
    }

    pub fn pop_back(&mut self) -> Option<PatchOperation> {
        self.operations.pop_back()
    }

    pub fn pop_front(&mut self) -> Option<PatchOperation> {
        self.operations.pop_front()
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, PatchOperation> {
        self.operations.iter()
    }

    /// Move every operation of `other` to the end of this patch.
    pub fn append(&mut self, mut other: Patch) {
        self.operations.append(&mut other.operations);
    }

    /// Move every operation of `other` to the front, keeping their order.
    pub fn prepend(&mut self, other: Patch) {
        for op in other.operations.into_iter().rev() {
            self.operations.push_front(op);
        }
    }

    // ── Application ───────────────────────────────────────────────────────

    /// Apply with [`HaltOnFailure`]: either every operation succeeds or
    /// `root` is left unchanged.
    pub fn apply_in_place(&self, root: &mut Value) -> Result<(), PatchFailure> {
        self.apply_in_place_with(root, &mut HaltOnFailure)
    }

    pub fn apply(&self, root: Value) -> Result<Value, PatchFailure> {
        self.apply_with(root, &mut HaltOnFailure)
    }

    pub fn apply_with<S: PatchStrategy + ?Sized>(
        &self,
        mut root: Value,
        strategy: &mut S,
    ) -> Result<Value, PatchFailure> {
        self.apply_in_place_with(&mut root, strategy)?;
        Ok(root)
    }

    /// Apply every operation in order, consulting `strategy` after each.
    ///
    /// Operations run against a copy-on-write working tree. It replaces
    /// `root` unless the strategy stopped the patch after a failure.
    ///
    /// # Errors
    ///
    /// [`PatchFailure`] listing each failed operation, whether or not the
    /// strategy continued past it.
    pub fn apply_in_place_with<S: PatchStrategy + ?Sized>(
        &self,
        root: &mut Value,
        strategy: &mut S,
    ) -> Result<(), PatchFailure> {
        let mut working = root.clone();
        let mut failures = Vec::new();
        let mut halted = false;

        for (index, op) in self.operations.iter().enumerate() {
            let outcome = op.apply_in_place(&mut working);
            match &outcome {
                Ok(()) => trace!(index, op = %op, "applied patch operation"),
                Err(error) => {
                    debug!(index, op = %op, error = %error, "patch operation failed");
                    failures.push(OperationFailure {
                        index,
                        op: op.op_type(),
                        error: error.clone(),
                    });
                }
            }

            let mut state = PatchingState {
                patch: self,
                operation_index: index,
                last_operation: op,
                outcome: &outcome,
                root: &mut working,
                should_continue: true,
            };
            strategy.on_operation_applied(&mut state);
            if !state.should_continue {
                debug!(index, remaining = self.len() - index - 1, "patch halted by strategy");
                halted = true;
                break;
            }
        }

        if failures.is_empty() {
            *root = working;
            return Ok(());
        }
        if !halted {
            *root = working;
        }
        Err(PatchFailure {
            failures,
            value: root.clone(),
        })
    }

    /// The patch that undoes this one when applied to the result of
    /// applying it to `before`.
    ///
    /// # Errors
    ///
    /// The first operation that fails against the running state.
    pub fn get_inverse(&self, before: &Value) -> Result<Patch, OperationFailure> {
        let mut state = before.clone();
        let mut inverse = Patch::new();
        for (index, op) in self.operations.iter().enumerate() {
            let failure = |error| OperationFailure {
                index,
                op: op.op_type(),
                error,
            };
            let step = op.get_inverse(&state).map_err(failure)?;
            op.apply_in_place(&mut state).map_err(failure)?;
            inverse.prepend(step);
        }
        Ok(inverse)
    }
}

impl Index<usize> for Patch {
    type Output = PatchOperation;

    fn index(&self, index: usize) -> &PatchOperation {
        &self.operations[index]
    }
}

impl IndexMut<usize> for Patch {
    fn index_mut(&mut self, index: usize) -> &mut PatchOperation {
        &mut self.operations[index]
    }
}

impl From<Vec<PatchOperation>> for Patch {
    fn from(ops: Vec<PatchOperation>) -> Self {
        Self {
            operations: ops.into(),
        }
    }
}

impl FromIterator<PatchOperation> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl Extend<PatchOperation> for Patch {
    fn extend<I: IntoIterator<Item = PatchOperation>>(&mut self, iter: I) {
        self.operations.extend(iter);
    }
}

impl IntoIterator for Patch {
    type Item = PatchOperation;
    type IntoIter = std::collections::vec_deque::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOperation;
    type IntoIter = std::collections::vec_deque::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
