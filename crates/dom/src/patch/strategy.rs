//! Hooks that decide how a patch reacts to each applied operation.

use super::sequence::Patch;
use super::types::{PatchError, PatchOperation};
use crate::value::Value;

/// State handed to a [`PatchStrategy`] after every operation.
///
/// `root` is the working tree being patched. A strategy may inspect or edit
/// it, and clears `should_continue` to stop the patch.
pub struct PatchingState<'a> {
    pub patch: &'a Patch,
    pub operation_index: usize,
    pub last_operation: &'a PatchOperation,
    pub outcome: &'a Result<(), PatchError>,
    pub root: &'a mut Value,
    pub should_continue: bool,
}

pub trait PatchStrategy {
    fn on_operation_applied(&mut self, state: &mut PatchingState<'_>);
}

impl<F> PatchStrategy for F
where
    F: FnMut(&mut PatchingState<'_>),
{
    fn on_operation_applied(&mut self, state: &mut PatchingState<'_>) {
        self(state)
    }
}

/// Stop at the first failing operation and keep the tree unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaltOnFailure;

impl PatchStrategy for HaltOnFailure {
    fn on_operation_applied(&mut self, state: &mut PatchingState<'_>) {
        state.should_continue = state.outcome.is_ok();
    }
}

/// Skip failing operations and apply the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFailureAndContinue;

impl PatchStrategy for IgnoreFailureAndContinue {
    fn on_operation_applied(&mut self, _state: &mut PatchingState<'_>) {}
}
