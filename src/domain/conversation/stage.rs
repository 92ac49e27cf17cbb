//! Conversation stages.
//!
//! The stage is the single source of truth for what the dialogue expects
//! the user to say next.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The current stage of the fact-find dialogue.
///
/// Stages flow in order but loop back when the user rejects a goal or
/// wants to add another:
/// - `CollectIdentity` → `SelectGoalKind` → `CollectGoalDetails` →
///   `ConfirmGoal` → `AskAddAnother` → `Done`
///
/// A stop command moves any stage straight to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// Collecting name, date of birth and email.
    #[default]
    CollectIdentity,

    /// Asking whether the goal is a home, a car, or something else.
    SelectGoalKind,

    /// Collecting the details of the pending goal.
    CollectGoalDetails,

    /// Asking the user to confirm the pending goal.
    ConfirmGoal,

    /// Asking whether to add another goal.
    AskAddAnother,

    /// Conversation finished.
    Done,
}

impl ConversationStage {
    /// All stages, in dialogue order.
    pub const ALL: [ConversationStage; 6] = [
        Self::CollectIdentity,
        Self::SelectGoalKind,
        Self::CollectGoalDetails,
        Self::ConfirmGoal,
        Self::AskAddAnother,
        Self::Done,
    ];

    /// Returns true if a pending goal must exist in this stage.
    pub fn holds_pending_goal(&self) -> bool {
        matches!(self, Self::CollectGoalDetails | Self::ConfirmGoal)
    }
}

impl StateMachine for ConversationStage {
    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationStage::*;
        match self {
            CollectIdentity => vec![SelectGoalKind, Done],
            SelectGoalKind => vec![CollectGoalDetails, Done],
            // Back to goal selection when the pending goal has gone missing
            CollectGoalDetails => vec![ConfirmGoal, SelectGoalKind, Done],
            // Back to identity when a goal is confirmed with no person on record
            ConfirmGoal => vec![AskAddAnother, SelectGoalKind, CollectIdentity, Done],
            AskAddAnother => vec![SelectGoalKind, Done],
            Done => vec![],
        }
    }
}
