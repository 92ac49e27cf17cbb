//! State machine trait for stage enums.
//!
//! Gives every enum that models a lifecycle the same way of validating
//! and performing transitions.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors list their valid transitions and get a validated
/// `transition_to` for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConversationStage {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             CollectIdentity => vec![SelectGoalKind, Done],
///             // ... etc
///         }
///     }
/// }
///
/// let next = stage.transition_to(ConversationStage::SelectGoalKind)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs a transition, returning an error if it is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if the current state is terminal (no outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
