//! State machine trait for closed status enums.

use super::{DomainError, ErrorCode};

/// Trait for status enums whose values move through a fixed set of transitions.
///
/// Implementors list the allowed edges; `transition_to` turns a rejected edge
/// into an `INVALID_STATE_TRANSITION` error.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Display {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation.
    ///
    /// Re-applying the current state is accepted and yields the same state.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if *self == target || self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {} to {}", self, target),
            )
            .with_detail("from", self.to_string())
            .with_detail("to", target.to_string()))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
