/// JSON value coercion for patch setters
///
/// Patch payloads arrive untyped; each setter coerces its value to the
/// field's declared type through these helpers. A failed coercion is a
/// [`PatchError::TypeCoercion`] naming the field, the expected type, and
/// what actually arrived.

use serde_json::Value as JsonValue;

use super::PatchError;

/// Coerces a required string field
pub fn string(field: &str, value: &JsonValue) -> Result<String, PatchError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(field, "a string", value))
}

/// Coerces a nullable string field; JSON null clears it
pub fn opt_string(field: &str, value: &JsonValue) -> Result<Option<String>, PatchError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        other => Err(mismatch(field, "a string or null", other)),
    }
}

/// Coerces a required integer field
pub fn int(field: &str, value: &JsonValue) -> Result<i32, PatchError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| mismatch(field, "a 32-bit integer", value))
}

/// Coerces a nullable integer field; JSON null clears it
pub fn opt_int(field: &str, value: &JsonValue) -> Result<Option<i32>, PatchError> {
    match value {
        JsonValue::Null => Ok(None),
        other => int(field, other).map(Some),
    }
}

fn mismatch(field: &str, expected: &'static str, value: &JsonValue) -> PatchError {
    PatchError::TypeCoercion {
        field: field.to_string(),
        expected,
        actual: type_name(value),
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
