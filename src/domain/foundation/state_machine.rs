//! State machine trait for lifecycle enums.
//!
//! Both the per-session intake phase and the finalized record status are
//! small state machines. They share this trait so transitions are validated
//! the same way everywhere.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define the legal edges; `transition_to` and `is_terminal`
/// come for free.
///
/// # Example
///
/// ```ignore
/// let next = RecordStatus::Pending.transition_to(RecordStatus::PendingReview)?;
/// assert!(RecordStatus::Approved.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
