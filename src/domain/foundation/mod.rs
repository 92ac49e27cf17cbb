//! Foundation module - Shared domain primitives.
//!
//! Contains the error types and the state machine contract used by
//! the rest of the domain.

mod errors;
mod state_machine;

pub use errors::ValidationError;
pub use state_machine::StateMachine;
