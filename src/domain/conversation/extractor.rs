//! Field extraction through the text-understanding service.
//!
//! Builds a schema-specific prompt, sends it through the `AIProvider` port
//! and turns the reply into a flat JSON object. Failures never reach the
//! caller as errors: identity extraction yields an empty field set and goal
//! extraction yields `None`, so the dialogue can simply re-prompt.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use super::prompts::{goal_extraction_prompt, identity_extraction_prompt};
use crate::domain::factfind::GoalKind;
use crate::domain::normalize::{parse_amount, parse_date_from};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole};

/// Errors that can occur while extracting fields.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("provider call failed: {0}")]
    Provider(#[from] AIError),

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("unparseable date in field '{field}'")]
    UnparseableDate { field: &'static str },
}

/// A flat JSON object returned by the extraction service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedFields(Map<String, Value>);

impl ExtractedFields {
    /// An empty field set, used for failed identity extraction.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the trimmed string value of `key`, or `None` if it is missing,
    /// not a string, or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns `key` as an amount.
    ///
    /// Numbers are taken as-is, strings go through `parse_amount`, and
    /// anything missing or unreadable is 0.
    pub fn amount(&self, key: &str) -> f64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => parse_amount(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Returns `key` as an ISO date.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}

impl From<Map<String, Value>> for ExtractedFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Extracts identity and goal fields from free text.
#[derive(Clone)]
pub struct GoalExtractor {
    provider: Arc<dyn AIProvider>,
}

impl std::fmt::Debug for GoalExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalExtractor")
            .field("provider", &self.provider.provider_info())
            .finish()
    }
}

impl GoalExtractor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Extracts first name, last name, date of birth and email.
    ///
    /// Returns an empty field set on any failure.
    pub async fn extract_identity(&self, text: &str) -> ExtractedFields {
        match self.request_object(identity_extraction_prompt(text)).await {
            Ok(fields) => fields,
            Err(error) => {
                tracing::warn!(error = %error, "Identity extraction failed");
                ExtractedFields::empty()
            }
        }
    }

    /// Extracts the detail fields for a goal of `kind`.
    ///
    /// The first date field present (`purchase_date`, then `target_date`) is
    /// re-read relative to `today` and rewritten as an ISO date. A date field
    /// that is present but unreadable, including `null`, fails the whole
    /// extraction.
    pub async fn extract_goal_details(
        &self,
        text: &str,
        kind: GoalKind,
        today: NaiveDate,
    ) -> Option<ExtractedFields> {
        let result = self
            .request_object(goal_extraction_prompt(text, kind, today))
            .await
            .and_then(|fields| normalize_date_field(fields, today));

        match result {
            Ok(fields) => Some(fields),
            Err(error) => {
                tracing::warn!(error = %error, kind = %kind, "Goal extraction failed");
                None
            }
        }
    }

    async fn request_object(&self, prompt: String) -> Result<ExtractedFields, ExtractionError> {
        let request = CompletionRequest::new().with_message(MessageRole::User, prompt);

        let response = self.provider.complete(request).await?;
        let payload = strip_code_fence(&response.content);
        if payload.is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => Ok(ExtractedFields(map)),
            Ok(other) => Err(ExtractionError::NotAnObject(json_type_name(&other))),
            Err(e) => Err(ExtractionError::ParseError(e.to_string())),
        }
    }
}

/// Date keys checked after extraction, in priority order. Only the first one
/// present is re-read, whatever the goal kind.
const DATE_FIELDS: [&str; 2] = ["purchase_date", "target_date"];

fn normalize_date_field(
    mut fields: ExtractedFields,
    today: NaiveDate,
) -> Result<ExtractedFields, ExtractionError> {
    let Some((field, value)) = DATE_FIELDS
        .iter()
        .find_map(|&key| fields.0.get(key).map(|value| (key, value)))
    else {
        return Ok(fields);
    };

    let date = value
        .as_str()
        .and_then(|s| parse_date_from(s, today))
        .ok_or(ExtractionError::UnparseableDate { field })?;

    fields
        .0
        .insert(field.to_string(), Value::String(date.format("%Y-%m-%d").to_string()));
    Ok(fields)
}

/// Returns the body of the first ```json block, else the first bare ```
/// block, else the whole reply. An unclosed fence runs to the end.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();

    for opener in ["```json", "```"] {
        if let Some(start) = trimmed.find(opener) {
            let body = &trimmed[start + opener.len()..];
            let end = body.find("```").unwrap_or(body.len());
            return body[..end].trim();
        }
    }
    trimmed
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn extractor(provider: &MockAIProvider) -> GoalExtractor {
        GoalExtractor::new(Arc::new(provider.clone()))
    }

    mod code_fences {
        use super::*;

        #[test]
        fn strips_json_fence() {
            assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        }

        #[test]
        fn strips_bare_fence() {
            assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        }

        #[test]
        fn leaves_plain_json_alone() {
            assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        }

        #[test]
        fn finds_fence_after_leading_prose() {
            let reply = "Here is the extracted data:\n```json\n{\"a\": 1}\n```\nLet me know!";
            assert_eq!(strip_code_fence(reply), "{\"a\": 1}");
        }

        #[test]
        fn json_fence_preferred_over_earlier_bare_fence() {
            let reply = "```\nnotes\n```\n```json\n{}\n```";
            assert_eq!(strip_code_fence(reply), "{}");
        }

        #[test]
        fn unclosed_fence_runs_to_end() {
            assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
        }
    }

    mod fields {
        use super::*;
        use serde_json::json;

        fn fields(value: Value) -> ExtractedFields {
            match value {
                Value::Object(map) => map.into(),
                _ => panic!("test fixture must be an object"),
            }
        }

        #[test]
        fn text_trims_and_rejects_blank() {
            let f = fields(json!({"a": "  London ", "b": "   ", "c": 5}));
            assert_eq!(f.text("a"), Some("London".to_string()));
            assert_eq!(f.text("b"), None);
            assert_eq!(f.text("c"), None);
            assert_eq!(f.text("missing"), None);
        }

        #[test]
        fn amount_reads_numbers_and_strings() {
            let f = fields(json!({"n": 500000, "s": "1.5M", "bad": "lots", "null": null}));
            assert_eq!(f.amount("n"), 500_000.0);
            assert_eq!(f.amount("s"), 1_500_000.0);
            assert_eq!(f.amount("bad"), 0.0);
            assert_eq!(f.amount("null"), 0.0);
            assert_eq!(f.amount("missing"), 0.0);
        }

        #[test]
        fn date_reads_iso_only() {
            let f = fields(json!({"iso": "2028-10-15", "loose": "next year"}));
            assert_eq!(f.date("iso"), NaiveDate::from_ymd_opt(2028, 10, 15));
            assert_eq!(f.date("loose"), None);
        }
    }

    mod identity {
        use super::*;

        #[tokio::test]
        async fn parses_fenced_json() {
            let provider = MockAIProvider::new().with_response(
                "```json\n{\"first_name\": \"John\", \"last_name\": \"Smith\", \
                 \"date_of_birth\": \"1990-05-01\", \"email\": \"john@example.com\"}\n```",
            );

            let fields = extractor(&provider).extract_identity("John Smith ...").await;

            assert_eq!(fields.text("first_name"), Some("John".to_string()));
            assert_eq!(fields.date("date_of_birth"), NaiveDate::from_ymd_opt(1990, 5, 1));
        }

        #[tokio::test]
        async fn reads_fenced_json_after_a_preamble() {
            let provider = MockAIProvider::new().with_response(
                "Here is the extracted data:\n```json\n{\"first_name\": \"John\", \
                 \"last_name\": \"Smith\", \"date_of_birth\": \"1990-05-01\", \
                 \"email\": \"john@example.com\"}\n```",
            );

            let fields = extractor(&provider).extract_identity("John Smith ...").await;

            assert!(!fields.is_empty());
            assert_eq!(fields.text("last_name"), Some("Smith".to_string()));
            assert_eq!(fields.text("email"), Some("john@example.com".to_string()));
        }

        #[tokio::test]
        async fn sends_one_user_message() {
            let provider = MockAIProvider::new().with_response("{}");

            extractor(&provider).extract_identity("John Smith").await;

            let calls = provider.get_calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].messages.len(), 1);
            assert_eq!(calls[0].messages[0].role, MessageRole::User);
            assert!(calls[0].messages[0].content.contains("\"John Smith\""));
        }

        #[tokio::test]
        async fn malformed_json_yields_empty_fields() {
            let provider = MockAIProvider::new().with_response("{not json");
            assert!(extractor(&provider).extract_identity("x").await.is_empty());
        }

        #[tokio::test]
        async fn provider_error_yields_empty_fields() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".to_string(),
            });
            assert!(extractor(&provider).extract_identity("x").await.is_empty());
        }

        #[tokio::test]
        async fn array_payload_yields_empty_fields() {
            let provider = MockAIProvider::new().with_response("[1, 2]");
            assert!(extractor(&provider).extract_identity("x").await.is_empty());
        }
    }

    mod goal_details {
        use super::*;

        #[tokio::test]
        async fn relative_date_is_rewritten_as_iso() {
            let provider = MockAIProvider::new().with_response(
                r#"{"location": "London", "house_price": 500000, "deposit_amount": "50k", "purchase_date": "in 2 years"}"#,
            );

            let fields = extractor(&provider)
                .extract_goal_details("...", GoalKind::NewHome, today())
                .await
                .unwrap();

            assert_eq!(fields.get("purchase_date"), Some(&Value::from("2028-10-15")));
            assert_eq!(fields.amount("deposit_amount"), 50_000.0);
        }

        #[tokio::test]
        async fn other_goals_use_target_date() {
            let provider = MockAIProvider::new().with_response(
                r#"{"description": "Start a business", "amount_required": 50000, "target_date": "2027"}"#,
            );

            let fields = extractor(&provider)
                .extract_goal_details("...", GoalKind::Other, today())
                .await
                .unwrap();

            assert_eq!(fields.date("target_date"), NaiveDate::from_ymd_opt(2027, 1, 1));
        }

        #[tokio::test]
        async fn unreadable_date_fails_extraction() {
            let provider = MockAIProvider::new()
                .with_response(r#"{"car_type": "Tesla", "car_price": 40000, "purchase_date": "someday"}"#);

            let result = extractor(&provider)
                .extract_goal_details("...", GoalKind::NewCar, today())
                .await;

            assert!(result.is_none());
        }

        #[tokio::test]
        async fn null_date_fails_extraction() {
            let provider = MockAIProvider::new()
                .with_response(r#"{"car_type": "Tesla", "car_price": 40000, "purchase_date": null}"#);

            let result = extractor(&provider)
                .extract_goal_details("...", GoalKind::NewCar, today())
                .await;

            assert!(result.is_none());
        }

        #[tokio::test]
        async fn stray_date_key_is_still_checked() {
            let provider = MockAIProvider::new().with_response(
                r#"{"location": "Leeds", "house_price": 300000, "target_date": "someday"}"#,
            );

            let result = extractor(&provider)
                .extract_goal_details("...", GoalKind::NewHome, today())
                .await;

            assert!(result.is_none());
        }

        #[tokio::test]
        async fn missing_date_is_accepted() {
            let provider = MockAIProvider::new()
                .with_response(r#"{"car_type": "Tesla", "car_price": 40000}"#);

            let fields = extractor(&provider)
                .extract_goal_details("...", GoalKind::NewCar, today())
                .await
                .unwrap();

            assert_eq!(fields.date("purchase_date"), None);
        }

        #[tokio::test]
        async fn empty_response_fails_extraction() {
            let provider = MockAIProvider::new().with_response("   ");

            let result = extractor(&provider)
                .extract_goal_details("...", GoalKind::Other, today())
                .await;

            assert!(result.is_none());
        }

        #[tokio::test]
        async fn prompt_carries_today() {
            let provider = MockAIProvider::new().with_response("{}");

            extractor(&provider)
                .extract_goal_details("in 3 years", GoalKind::NewHome, today())
                .await;

            assert!(provider.get_calls()[0].messages[0].content.contains("2026-10-16"));
        }
    }
}
