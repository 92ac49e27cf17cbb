//! Goal Intake - Conversational financial fact-find.
//!
//! This crate collects a user's identity and financial goals through a
//! turn-based dialogue, using a language model to pull structured fields out
//! of free-text answers.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
