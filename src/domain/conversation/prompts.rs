//! Message templates for the fact-find dialogue.
//!
//! Holds everything the assistant says to the user, and the extraction
//! prompts sent to the text-understanding service.

use chrono::NaiveDate;

use crate::domain::factfind::{GoalDetails, GoalKind};

// ============================================================================
// Assistant Messages
// ============================================================================

pub const IDENTITY_REPROMPT: &str =
    "Please provide your full name, date of birth (YYYY-MM-DD), and email";

pub const GOAL_KIND_QUESTION: &str =
    "Thank you! What financial goal would you like to discuss? (new home/new car/other)";

pub const GOAL_KIND_RETRY: &str =
    "Okay, let's try again. What goal would you like to discuss? (new home/new car/other)";

pub const GOAL_SAVED: &str = "Goal saved! Would you like to add another goal? (yes/no)";

pub const NEXT_GOAL_QUESTION: &str =
    "What other financial goal would you like to discuss? (new home/new car/other)";

pub const CLOSING: &str = "Thank you for providing your financial goals information.";

/// The follow-up question asked once the goal kind is known.
pub fn details_question(kind: GoalKind) -> &'static str {
    match kind {
        GoalKind::NewHome => {
            "Please tell me about the home you want to buy (location, price, deposit, and timeline)"
        }
        GoalKind::NewCar => {
            "Please tell me about the car you want to buy (make/model, price, and timeline)"
        }
        GoalKind::Other => {
            "Please describe your financial goal (what you want to achieve, how much money you'll need, and by when)"
        }
    }
}

/// The re-prompt sent when goal details could not be extracted.
pub fn details_reprompt(kind: GoalKind) -> &'static str {
    match kind {
        GoalKind::NewHome => {
            "I couldn't understand those home details. Please provide: location, price, deposit, and timeline (e.g. 'Buy $1.5M home in London with 50k deposit in 3 years')"
        }
        GoalKind::NewCar => {
            "I couldn't understand those car details. Please provide: make/model, price, and timeline (e.g. 'Buy a Tesla Model 3 for $40k in 6 months')"
        }
        GoalKind::Other => {
            "I couldn't understand that goal. Please describe what you want to achieve, how much money you'll need, and by when (e.g. 'Start a business needing $50k by 2025')"
        }
    }
}

/// Summary of captured details, asking for a yes/no confirmation.
pub fn confirmation(details: &GoalDetails) -> String {
    match details {
        GoalDetails::NewHome(home) => format!(
            "Confirm: Buy home in {} for {} with {} deposit by {}? (yes/no)",
            home.location,
            format_money(home.house_price),
            format_money(home.deposit_amount),
            format_date(home.purchase_date),
        ),
        GoalDetails::NewCar(car) => format!(
            "Confirm: Buy {} for {} by {}? (yes/no)",
            car.car_type,
            format_money(car.car_price),
            format_date(car.purchase_date),
        ),
        GoalDetails::Other(other) => format!(
            "Confirm: {} requiring {} by {}? (yes/no)",
            other.description,
            format_money(other.amount_required),
            format_date(other.target_date),
        ),
    }
}

/// Formats an amount as dollars with thousands separators and cents.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}

/// Formats an optional date as ISO, or "an unspecified date".
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "an unspecified date".to_string(),
    }
}

// ============================================================================
// Extraction Prompts
// ============================================================================

/// Prompt asking for identity fields as JSON.
pub fn identity_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract personal information from this text:
"{text}"

Rules:
- First name and last name must be separated
- Date of birth must be in YYYY-MM-DD format (convert if needed)
- Email must be valid format

Return JSON with these exact fields:
{{
    "first_name": "string (required)",
    "last_name": "string (required)",
    "date_of_birth": "string as YYYY-MM-DD (required)",
    "email": "string (required)"
}}"#
    )
}

/// Prompt asking for the detail fields of one goal kind as JSON.
///
/// `today` is included so the service can resolve relative dates.
pub fn goal_extraction_prompt(text: &str, kind: GoalKind, today: NaiveDate) -> String {
    match kind {
        GoalKind::NewHome => format!(
            r#"Extract home purchase details from:
"{text}"

Return JSON with:
- location
- house_price (number)
- deposit_amount (number)
- purchase_date (YYYY-MM-DD format)

Rules:
- Convert amounts to numbers (e.g. "1.5M" → 1500000)
- For relative dates like "in 3 years", calculate the exact date from today ({today})
- For month names, use full month name (e.g. "January")"#
        ),
        GoalKind::NewCar => format!(
            r#"Extract car purchase details from:
"{text}"

Return JSON with:
- car_type (make + model)
- car_price (number)
- purchase_date (YYYY-MM-DD format)

Rules:
- Convert amounts to numbers (e.g. "20k" → 20000)
- For relative dates like "next month", calculate the exact date from today ({today})"#
        ),
        GoalKind::Other => format!(
            r#"Extract financial goal details from:
"{text}"

Return JSON with:
- description
- amount_required (number)
- target_date (YYYY-MM-DD format)

Rules:
- Convert amounts to numbers
- For relative dates like "by next year", calculate the exact date from today ({today})"#
        ),
    }
}
