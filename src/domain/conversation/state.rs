//! Dialogue state.
//!
//! `DialogueState` is the whole conversation as a value: the transcript,
//! the messages produced by the latest turn, and what has been gathered so
//! far. The engine never mutates a state; each turn returns a new one.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::prompts::{format_date, format_money};
use super::stage::ConversationStage;
use crate::domain::factfind::{Goal, GoalDetails, Person};

/// Everything gathered so far.
///
/// # Invariants
///
/// - `pending_goal` is set iff `stage` is `CollectGoalDetails` or `ConfirmGoal`
/// - `person` is unset only while identity has not been confirmed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GatheredInformation {
    pub person: Option<Person>,
    pub pending_goal: Option<Goal>,
    pub stage: ConversationStage,
}

impl GatheredInformation {
    /// Returns true if the pending-goal invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.pending_goal.is_some() == self.stage.holds_pending_goal()
    }
}

impl fmt::Display for GatheredInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(person) = &self.person else {
            return f.write_str("No user information collected yet.");
        };

        write!(
            f,
            "User: {} {}, Email: {}, DOB: {}\n\nGoals:\n",
            person.first_name(),
            person.last_name(),
            person.email(),
            format_date(person.date_of_birth()),
        )?;

        for (i, goal) in person.goals().iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "Goal {}: {} ({})", i + 1, goal.name(), goal.kind())?;

            match goal.details() {
                Some(GoalDetails::NewHome(home)) => write!(
                    f,
                    "\n  Location: {}\n  Price: {}\n  Deposit: {}\n  Target Date: {}",
                    home.location,
                    format_money(home.house_price),
                    format_money(home.deposit_amount),
                    format_date(home.purchase_date),
                )?,
                Some(GoalDetails::NewCar(car)) => write!(
                    f,
                    "\n  Car: {}\n  Price: {}\n  Target Date: {}",
                    car.car_type,
                    format_money(car.car_price),
                    format_date(car.purchase_date),
                )?,
                Some(GoalDetails::Other(other)) => write!(
                    f,
                    "\n  Description: {}\n  Amount Needed: {}\n  Target Date: {}",
                    other.description,
                    format_money(other.amount_required),
                    format_date(other.target_date),
                )?,
                None => {}
            }
        }

        Ok(())
    }
}

/// The conversation as of the end of a turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogueState {
    /// True once the conversation has reached `Done`.
    pub finished: bool,
    /// Every message before the latest turn's assistant output.
    pub transcript: Vec<Message>,
    /// Assistant messages produced by the latest turn, for display.
    pub new_messages: Vec<Message>,
    pub gathered: GatheredInformation,
}

impl DialogueState {
    /// Creates the state of a conversation that has not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ConversationStage {
        self.gathered.stage
    }

    pub fn person(&self) -> Option<&Person> {
        self.gathered.person.as_ref()
    }

    pub fn pending_goal(&self) -> Option<&Goal> {
        self.gathered.pending_goal.as_ref()
    }

    /// The whole conversation, including the latest turn's output.
    pub fn full_transcript(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().chain(self.new_messages.iter())
    }
}
