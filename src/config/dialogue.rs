//! Dialogue configuration

use chrono::NaiveDate;
use serde::Deserialize;

/// Dialogue configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogueConfig {
    /// Pins "today" for relative dates, e.g. `2026-10-16`.
    /// The local calendar date is used when unset.
    pub reference_date: Option<NaiveDate>,
}
