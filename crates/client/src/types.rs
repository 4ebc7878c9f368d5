use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /portfolios/{id}/recalculate_all_irr`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecalculateIrrRequest {
    pub irr_date: NaiveDate,
}

/// Pulls a human-readable message out of a backend error body.
///
/// Looks at `detail` first (a string, or a list of `{ "msg": .. }` items),
/// then `message`, then `error`. Bodies that are not JSON yield `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;

    ["detail", "message", "error"]
        .iter()
        .filter_map(|key| payload.get(key))
        .find_map(message_from_value)
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => non_blank(s),
                    Value::Object(_) => item.get("msg").and_then(Value::as_str).and_then(non_blank),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        Value::Object(_) => value.get("message").and_then(message_from_value),
        _ => None,
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
