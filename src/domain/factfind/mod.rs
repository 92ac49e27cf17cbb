//! Fact-find records: the person and their financial goals.

mod goal;
mod person;

pub use goal::{Goal, GoalDetails, GoalKind, NewCarDetails, NewHomeDetails, OtherGoalDetails};
pub use person::Person;
