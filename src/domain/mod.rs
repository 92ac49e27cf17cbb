//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, state machine trait)
//! - `normalize` - Free-text date and currency normalization
//! - `factfind` - The person and goals being captured
//! - `conversation` - The dialogue engine and its state

pub mod conversation;
pub mod factfind;
pub mod foundation;
pub mod normalize;
