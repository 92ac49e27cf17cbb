//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Extraction service providers (OpenAI-compatible HTTP, mock)

pub mod ai;
