//! JSON conversions for assertions.

use anyhow::{Result, anyhow};
use serde_json::{Map, Value};

/// Unwraps a JSON object, failing for any other shape.
///
/// # Errors
///
/// Returns an error when `value` is not an object.
pub fn object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, found {other}")),
    }
}
