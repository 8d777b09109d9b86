//! Inbound webhook payload, extracted permissively from raw JSON.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::types::ServiceHealth;

/// Webhook rejection. Only a non-object body is refused.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Webhook body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Webhook body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Fields extracted from a webhook body. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookUpdate {
    /// Replacement service table (`metrics`)
    pub metrics: Option<BTreeMap<String, ServiceHealth>>,
    /// Narrative AI report (`aiReport`)
    pub ai_report: Option<String>,
    /// Raw AI output stored as an insight (`raw_ai`)
    pub raw_analysis: Option<String>,
}

impl WebhookUpdate {
    /// Parse a request body. Fails only if the body is not a JSON object.
    ///
    /// An empty (or all-whitespace) body reads as `{}`.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::try_from(value)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_none() && self.ai_report.is_none() && self.raw_analysis.is_none()
    }
}

impl TryFrom<Value> for WebhookUpdate {
    type Error = WebhookError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut body) = value else {
            return Err(WebhookError::NotAnObject(json_kind(&value)));
        };

        let metrics = match body.remove("metrics") {
            None | Some(Value::Null) => None,
            Some(Value::Object(services)) => Some(
                services
                    .iter()
                    .map(|(name, v)| (name.clone(), ServiceHealth::from_value(v)))
                    .collect(),
            ),
            Some(other) => {
                warn!(kind = json_kind(&other), "Ignoring webhook metrics that are not an object");
                None
            }
        };

        let ai_report = match body.remove("aiReport") {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            None | Some(Value::Null | Value::String(_)) => None,
            Some(other) => {
                warn!(kind = json_kind(&other), "Ignoring webhook aiReport that is not a string");
                None
            }
        };

        let raw_analysis = match body.remove("raw_ai") {
            Some(v) if is_falsy(&v) => None,
            None => None,
            Some(Value::String(s)) => Some(s),
            // Structured AI output is kept as its JSON text
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            metrics,
            ai_report,
            raw_analysis,
        })
    }
}

/// `null`, `false`, `0` and `""` carry no analysis.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn test_rejects_non_objects() {
        for body in [json!([1, 2]), json!("hi"), json!(3), json!(null)] {
            assert!(matches!(
                WebhookUpdate::try_from(body),
                Err(WebhookError::NotAnObject(_))
            ));
        }
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(
            WebhookUpdate::from_slice(b"{not json"),
            Err(WebhookError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        assert!(WebhookUpdate::from_slice(b"").unwrap().is_empty());
        assert!(WebhookUpdate::from_slice(b" \n").unwrap().is_empty());
    }

    #[test]
    fn test_falsy_raw_ai_is_absent() {
        for raw in [json!(false), json!(0), json!(0.0), json!(""), json!(null)] {
            let update = WebhookUpdate::try_from(json!({ "raw_ai": raw.clone() })).unwrap();
            assert!(update.raw_analysis.is_none(), "raw_ai {raw} should be skipped");
        }
    }

    #[test]
    fn test_truthy_scalar_raw_ai_kept_as_text() {
        let update = WebhookUpdate::try_from(json!({ "raw_ai": true })).unwrap();
        assert_eq!(update.raw_analysis.as_deref(), Some("true"));
        let update = WebhookUpdate::try_from(json!({ "raw_ai": 7 })).unwrap();
        assert_eq!(update.raw_analysis.as_deref(), Some("7"));
    }

    #[test]
    fn test_empty_object_is_empty_update() {
        let update = WebhookUpdate::from_slice(b"{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_extracts_all_fields() {
        let update = WebhookUpdate::try_from(json!({
            "metrics": {"auth": {"code": 200}, "payment": {"code": 500}},
            "aiReport": "payment CRITICAL",
            "raw_ai": "{\"severity\":\"critical\"}",
            "unrelated": true
        }))
        .unwrap();

        let metrics = update.metrics.unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["payment"].code, 500);
        assert_eq!(update.ai_report.as_deref(), Some("payment CRITICAL"));
        assert_eq!(
            update.raw_analysis.as_deref(),
            Some("{\"severity\":\"critical\"}")
        );
    }

    #[test]
    fn test_unexpected_shapes_pass_through_best_effort() {
        let update = WebhookUpdate::try_from(json!({
            "metrics": "all good",
            "aiReport": 42,
            "raw_ai": {"summary": "HEALTHY"}
        }))
        .unwrap();

        assert!(update.metrics.is_none());
        assert!(update.ai_report.is_none());
        assert_eq!(
            update.raw_analysis.as_deref(),
            Some(r#"{"summary":"HEALTHY"}"#)
        );
    }

    #[test]
    fn test_null_and_empty_fields_are_absent() {
        let update = WebhookUpdate::try_from(json!({
            "metrics": null,
            "aiReport": "",
            "raw_ai": ""
        }))
        .unwrap();
        assert!(update.is_empty());
    }
}
