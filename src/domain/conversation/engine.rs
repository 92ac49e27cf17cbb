//! Dialogue engine.
//!
//! Advances a fact-find conversation by one user utterance. Each stage has
//! its own handler; every stage change goes through the `StateMachine`
//! impl on `ConversationStage`.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::extractor::{ExtractedFields, GoalExtractor};
use super::message::Message;
use super::prompts::{
    confirmation, details_question, details_reprompt, CLOSING, GOAL_KIND_QUESTION,
    GOAL_KIND_RETRY, GOAL_SAVED, IDENTITY_REPROMPT, NEXT_GOAL_QUESTION,
};
use super::stage::ConversationStage;
use super::state::{DialogueState, GatheredInformation};
use crate::domain::factfind::{
    Goal, GoalDetails, GoalKind, NewCarDetails, NewHomeDetails, OtherGoalDetails, Person,
};
use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::normalize::parse_date_from;
use crate::ports::AIProvider;

/// Utterances that end the conversation from any stage.
pub const STOP_COMMANDS: [&str; 4] = ["exit", "quit", "stop", "done"];

/// Returns true if the trimmed, lower-cased utterance is a stop command.
pub fn is_stop_command(utterance: &str) -> bool {
    let normalized = utterance.trim().to_lowercase();
    STOP_COMMANDS.contains(&normalized.as_str())
}

fn is_affirmative(utterance: &str) -> bool {
    utterance.trim().to_lowercase().starts_with('y')
}

/// What one stage handler produced.
struct Turn {
    gathered: GatheredInformation,
    messages: Vec<Message>,
}

impl Turn {
    fn say(gathered: GatheredInformation, text: impl Into<String>) -> Self {
        Self {
            gathered,
            messages: vec![Message::ai(text)],
        }
    }

    fn silent(gathered: GatheredInformation) -> Self {
        Self {
            gathered,
            messages: Vec::new(),
        }
    }
}

/// Moves `from` to `to`, keeping `from` if the move is not allowed.
fn enter(from: ConversationStage, to: ConversationStage) -> ConversationStage {
    match from.transition_to(to) {
        Ok(next) => {
            tracing::debug!(from = ?from, to = ?next, "Stage transition");
            next
        }
        Err(error) => {
            tracing::warn!(error = %error, "Rejected stage transition");
            from
        }
    }
}

/// Drives the fact-find dialogue.
///
/// The engine holds no per-conversation state, so one instance can serve
/// any number of conversations.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    extractor: GoalExtractor,
    reference_date: Option<NaiveDate>,
}

impl DialogueEngine {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            extractor: GoalExtractor::new(provider),
            reference_date: None,
        }
    }

    /// Pins "today" for relative date phrases.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The date relative phrases are resolved against.
    pub fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Processes one user utterance and returns the next state.
    ///
    /// The previous turn's output and `utterance` are folded into the
    /// transcript; `new_messages` holds only what this turn said.
    pub async fn advance(&self, state: &DialogueState, utterance: &str) -> DialogueState {
        let stage = state.stage();
        tracing::debug!(stage = ?stage, "Advancing dialogue");

        let turn = if is_stop_command(utterance) {
            self.stop(&state.gathered)
        } else {
            match stage {
                ConversationStage::CollectIdentity => {
                    self.collect_identity(&state.gathered, utterance).await
                }
                ConversationStage::SelectGoalKind => {
                    self.select_goal_kind(&state.gathered, utterance)
                }
                ConversationStage::CollectGoalDetails => {
                    self.collect_goal_details(&state.gathered, utterance).await
                }
                ConversationStage::ConfirmGoal => self.confirm_goal(&state.gathered, utterance),
                ConversationStage::AskAddAnother => {
                    self.ask_add_another(&state.gathered, utterance)
                }
                ConversationStage::Done => Turn::silent(state.gathered.clone()),
            }
        };

        let mut transcript =
            Vec::with_capacity(state.transcript.len() + state.new_messages.len() + 1);
        transcript.extend(state.transcript.iter().cloned());
        transcript.extend(state.new_messages.iter().cloned());
        transcript.push(Message::user(utterance));

        DialogueState {
            finished: turn.gathered.stage == ConversationStage::Done,
            transcript,
            new_messages: turn.messages,
            gathered: turn.gathered,
        }
    }

    fn stop(&self, gathered: &GatheredInformation) -> Turn {
        let stage = match gathered.stage {
            ConversationStage::Done => ConversationStage::Done,
            from => enter(from, ConversationStage::Done),
        };
        let next = GatheredInformation {
            person: gathered.person.clone(),
            pending_goal: None,
            stage,
        };
        Turn::say(next, CLOSING)
    }

    async fn collect_identity(&self, gathered: &GatheredInformation, utterance: &str) -> Turn {
        let fields = self.extractor.extract_identity(utterance).await;

        let (Some(first_name), Some(last_name), Some(date_of_birth), Some(email)) = (
            fields.text("first_name"),
            fields.text("last_name"),
            fields.text("date_of_birth"),
            fields.text("email"),
        ) else {
            return Turn::say(gathered.clone(), IDENTITY_REPROMPT);
        };

        // An unreadable date of birth does not block the conversation
        let date_of_birth = parse_date_from(&date_of_birth, self.today());
        let next = GatheredInformation {
            person: Some(Person::new(first_name, last_name, date_of_birth, email)),
            pending_goal: None,
            stage: enter(gathered.stage, ConversationStage::SelectGoalKind),
        };
        Turn::say(next, GOAL_KIND_QUESTION)
    }

    fn select_goal_kind(&self, gathered: &GatheredInformation, utterance: &str) -> Turn {
        let kind = GoalKind::from_utterance(utterance);
        let next = GatheredInformation {
            person: gathered.person.clone(),
            pending_goal: Some(Goal::pending(kind)),
            stage: enter(gathered.stage, ConversationStage::CollectGoalDetails),
        };
        Turn::say(next, details_question(kind))
    }

    async fn collect_goal_details(&self, gathered: &GatheredInformation, utterance: &str) -> Turn {
        let Some(pending) = gathered.pending_goal.clone() else {
            tracing::warn!("Collecting goal details with no pending goal");
            let next = GatheredInformation {
                person: gathered.person.clone(),
                pending_goal: None,
                stage: enter(gathered.stage, ConversationStage::SelectGoalKind),
            };
            return Turn::say(next, GOAL_KIND_RETRY);
        };

        let kind = pending.kind();
        let Some(fields) = self
            .extractor
            .extract_goal_details(utterance, kind, self.today())
            .await
        else {
            return Turn::say(gathered.clone(), details_reprompt(kind));
        };

        let details = build_details(kind, &fields);
        let message = confirmation(&details);
        match pending.with_details(details) {
            Ok(goal) => {
                let next = GatheredInformation {
                    person: gathered.person.clone(),
                    pending_goal: Some(goal),
                    stage: enter(gathered.stage, ConversationStage::ConfirmGoal),
                };
                Turn::say(next, message)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Extracted details did not fit the pending goal");
                Turn::say(gathered.clone(), details_reprompt(kind))
            }
        }
    }

    fn confirm_goal(&self, gathered: &GatheredInformation, utterance: &str) -> Turn {
        if !is_affirmative(utterance) {
            let next = GatheredInformation {
                person: gathered.person.clone(),
                pending_goal: None,
                stage: enter(gathered.stage, ConversationStage::SelectGoalKind),
            };
            return Turn::say(next, GOAL_KIND_RETRY);
        }

        let Some(person) = gathered.person.clone() else {
            tracing::warn!("Goal confirmed with no person on record");
            let next = GatheredInformation {
                person: None,
                pending_goal: None,
                stage: enter(gathered.stage, ConversationStage::CollectIdentity),
            };
            return Turn::say(next, IDENTITY_REPROMPT);
        };

        let committed = match gathered.pending_goal.clone() {
            Some(goal) => person.clone().commit_goal(goal),
            None => Err(ValidationError::empty_field("pending_goal")),
        };

        match committed {
            Ok(person) => {
                let next = GatheredInformation {
                    person: Some(person),
                    pending_goal: None,
                    stage: enter(gathered.stage, ConversationStage::AskAddAnother),
                };
                Turn::say(next, GOAL_SAVED)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Could not commit pending goal");
                let next = GatheredInformation {
                    person: Some(person),
                    pending_goal: None,
                    stage: enter(gathered.stage, ConversationStage::SelectGoalKind),
                };
                Turn::say(next, GOAL_KIND_RETRY)
            }
        }
    }

    fn ask_add_another(&self, gathered: &GatheredInformation, utterance: &str) -> Turn {
        let (to, message) = if is_affirmative(utterance) {
            (ConversationStage::SelectGoalKind, NEXT_GOAL_QUESTION)
        } else {
            (ConversationStage::Done, CLOSING)
        };
        let next = GatheredInformation {
            person: gathered.person.clone(),
            pending_goal: None,
            stage: enter(gathered.stage, to),
        };
        Turn::say(next, message)
    }
}

/// Builds the details for `kind`; missing text is empty, missing amounts are 0.
fn build_details(kind: GoalKind, fields: &ExtractedFields) -> GoalDetails {
    let text = |key: &str| fields.text(key).unwrap_or_default();
    match kind {
        GoalKind::NewHome => GoalDetails::NewHome(NewHomeDetails {
            location: text("location"),
            house_price: fields.amount("house_price"),
            deposit_amount: fields.amount("deposit_amount"),
            purchase_date: fields.date("purchase_date"),
        }),
        GoalKind::NewCar => GoalDetails::NewCar(NewCarDetails {
            car_type: text("car_type"),
            car_price: fields.amount("car_price"),
            purchase_date: fields.date("purchase_date"),
        }),
        GoalKind::Other => GoalDetails::Other(OtherGoalDetails {
            description: text("description"),
            amount_required: fields.amount("amount_required"),
            target_date: fields.date("target_date"),
        }),
    }
}
