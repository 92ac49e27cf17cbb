//! The person whose goals are being captured.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::goal::Goal;
use crate::domain::foundation::ValidationError;

/// Identity details plus the goals confirmed so far.
///
/// # Invariants
///
/// - Identity fields never change after construction
/// - Every goal in `goals` has details attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    first_name: String,
    last_name: String,
    /// `None` when the extracted date of birth could not be read.
    date_of_birth: Option<NaiveDate>,
    email: String,
    goals: Vec<Goal>,
}

impl Person {
    /// Creates a person with no goals.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: Option<NaiveDate>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            email: email.into(),
            goals: Vec::new(),
        }
    }

    /// Appends a confirmed goal.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the goal has no details yet
    pub fn commit_goal(mut self, goal: Goal) -> Result<Self, ValidationError> {
        if !goal.has_details() {
            return Err(ValidationError::empty_field("details"));
        }
        self.goals.push(goal);
        Ok(self)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Confirmed goals, in the order they were committed.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }
}
