//! Validation of raw decision service output
//!
//! The service is trusted for content but not for syntax: the text may be
//! wrapped in code fences and may not be JSON at all.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::ServiceError;
use crate::domain::Decision;

static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"));

/// Parses raw service text into a Decision
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    /// Strip fences, parse, and check field shapes
    ///
    /// `choice` must be a non-blank string. `reasoning` may be a string, null,
    /// or absent. Other fields are ignored. Membership of `choice` in the
    /// requested pool is not checked.
    pub fn validate(&self, raw: &str) -> Result<Decision, ServiceError> {
        debug!(raw_len = raw.len(), "validate: called");
        let clean = FENCE.replace_all(raw, "");
        let clean = clean.trim();

        let value: Value = serde_json::from_str(clean).map_err(|e| {
            debug!(error = %e, "validate: not JSON");
            ServiceError::Malformed(format!("not JSON: {}", e))
        })?;

        let object = value
            .as_object()
            .ok_or_else(|| ServiceError::Malformed("expected a JSON object".to_string()))?;

        let choice = match object.get("choice") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::String(_)) => return Err(ServiceError::Malformed("empty choice".to_string())),
            Some(_) => return Err(ServiceError::Malformed("choice is not a string".to_string())),
            None => return Err(ServiceError::Malformed("missing choice".to_string())),
        };

        let reasoning = match object.get("reasoning") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(_) => return Err(ServiceError::Malformed("reasoning is not a string".to_string())),
        };

        debug!(%choice, "validate: accepted");
        Ok(Decision::new(choice, reasoning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(raw: &str) -> Result<Decision, ServiceError> {
        ResponseValidator::new().validate(raw)
    }

    #[test]
    fn test_plain_json() {
        let decision = validate(r#"{"choice": "Tacos", "reasoning": "Quick and fun."}"#).unwrap();
        assert_eq!(decision.choice, "Tacos");
        assert_eq!(decision.reasoning.as_deref(), Some("Quick and fun."));
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"choice\": \"Ramen\", \"reasoning\": \"Warm.\"}\n```";
        assert_eq!(validate(raw).unwrap().choice, "Ramen");

        let raw = "```\n{\"choice\": \"Sushi\"}\n```";
        assert_eq!(validate(raw).unwrap().choice, "Sushi");

        let raw = "```JSON\n{\"choice\": \"Pizza\"}```";
        assert_eq!(validate(raw).unwrap().choice, "Pizza");
    }

    #[test]
    fn test_reasoning_optional() {
        assert_eq!(validate(r#"{"choice": "Journal"}"#).unwrap().reasoning, None);
        assert_eq!(validate(r#"{"choice": "Journal", "reasoning": null}"#).unwrap().reasoning, None);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let decision = validate(r#"{"choice": "Gym", "reasoning": "Energy.", "confidence": 0.9}"#).unwrap();
        assert_eq!(decision.choice, "Gym");
    }

    #[test]
    fn test_choice_outside_pool_accepted() {
        // No pool membership check
        assert_eq!(validate(r#"{"choice": "Skydiving"}"#).unwrap().choice, "Skydiving");
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = validate("I think you should have tacos today!").unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[test]
    fn test_bad_shapes_are_malformed() {
        for raw in [
            "",
            "[]",
            r#""Tacos""#,
            r#"{"reasoning": "no choice"}"#,
            r#"{"choice": ""}"#,
            r#"{"choice": "   "}"#,
            r#"{"choice": 42}"#,
            r#"{"choice": null}"#,
            r#"{"choice": "Tacos", "reasoning": ["a"]}"#,
        ] {
            assert!(
                matches!(validate(raw), Err(ServiceError::Malformed(_))),
                "expected malformed for {:?}",
                raw
            );
        }
    }
}
