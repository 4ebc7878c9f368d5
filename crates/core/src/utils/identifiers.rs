use crate::errors::{Result, ValidationError};

/// Parses a numeric record identifier received from a caller.
///
/// Missing, non-numeric and non-positive values are rejected before any
/// request is sent to the backend.
pub fn parse_identifier(raw: Option<&str>, field: &str) -> Result<i64> {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }

    match value.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}
