//! Conversation domain module.
//!
//! Runs the fact-find dialogue: stages, transcript messages, extraction
//! through the AI provider port, and the engine that ties them together.

mod engine;
mod extractor;
mod message;
pub mod prompts;
mod stage;
mod state;

pub use engine::{is_stop_command, DialogueEngine, STOP_COMMANDS};
pub use extractor::{ExtractedFields, ExtractionError, GoalExtractor};
pub use message::{Message, Sender};
pub use stage::ConversationStage;
pub use state::{DialogueState, GatheredInformation};
