//! Financial goals and their kind-specific details.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// The kind of financial goal being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    NewHome,
    NewCar,
    Other,
}

impl GoalKind {
    /// Picks a goal kind from a free-text answer.
    ///
    /// "home" is checked before "car"; anything else is `Other`.
    pub fn from_utterance(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("home") {
            Self::NewHome
        } else if lower.contains("car") {
            Self::NewCar
        } else {
            Self::Other
        }
    }

    /// Fixed display name given to goals of this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NewHome => "Buy a new home",
            Self::NewCar => "Buy a new car",
            Self::Other => "Other financial goal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewHome => "new_home",
            Self::NewCar => "new_car",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHomeDetails {
    pub location: String,
    pub house_price: f64,
    pub deposit_amount: f64,
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCarDetails {
    /// Make and model.
    pub car_type: String,
    pub car_price: f64,
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherGoalDetails {
    pub description: String,
    pub amount_required: f64,
    pub target_date: Option<NaiveDate>,
}

/// Kind-specific goal details, tagged by goal kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalDetails {
    NewHome(NewHomeDetails),
    NewCar(NewCarDetails),
    Other(OtherGoalDetails),
}

impl GoalDetails {
    /// The goal kind these details belong to.
    pub fn kind(&self) -> GoalKind {
        match self {
            Self::NewHome(_) => GoalKind::NewHome,
            Self::NewCar(_) => GoalKind::NewCar,
            Self::Other(_) => GoalKind::Other,
        }
    }
}

/// A financial goal.
///
/// A goal starts out pending with no details; details are attached once
/// they have been extracted, and only details of the goal's own kind are
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    kind: GoalKind,
    name: String,
    details: Option<GoalDetails>,
}

impl Goal {
    /// Creates a pending goal with the kind's display name and no details.
    pub fn pending(kind: GoalKind) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            details: None,
        }
    }

    /// Attaches details to the goal.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the details are for a different goal kind
    pub fn with_details(mut self, details: GoalDetails) -> Result<Self, ValidationError> {
        if details.kind() != self.kind {
            return Err(ValidationError::invalid_format(
                "details",
                format!("expected {} details, got {}", self.kind, details.kind()),
            ));
        }
        self.details = Some(details);
        Ok(self)
    }

    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn details(&self) -> Option<&GoalDetails> {
        self.details.as_ref()
    }

    /// Returns true once details have been attached.
    pub fn has_details(&self) -> bool {
        self.details.is_some()
    }
}
