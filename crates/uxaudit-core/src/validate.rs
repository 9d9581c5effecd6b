//! Response validation: raw model text in, immutable [`AnalysisResult`] out.

use serde_json::Value;

use crate::error::CoreError;
use crate::schema::{self, ANALYSIS_SCHEMA};
use crate::types::AnalysisResult;

/// Parses and validates the model's text body.
///
/// Validation is structural: required sections, JSON types and numeric ranges
/// from [`schema::ANALYSIS_SCHEMA`]. The payload is returned verbatim; points
/// and list entries keep their order and values.
///
/// # Errors
///
/// - [`CoreError::EmptyResponse`] when `raw` is `None`, empty or whitespace.
/// - [`CoreError::MalformedPayload`] when the body is not a JSON object or
///   violates the schema.
pub fn parse_analysis(raw: Option<&str>) -> Result<AnalysisResult, CoreError> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Err(CoreError::EmptyResponse),
        Some(text) => text,
    };

    let mut value: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::malformed(format!("body is not valid JSON: {e}")))?;

    if !value.is_object() {
        return Err(CoreError::malformed("top-level value must be a JSON object"));
    }

    schema::check(&ANALYSIS_SCHEMA, &value, "").map_err(CoreError::malformed)?;

    strip_nulls(&mut value);
    let result: AnalysisResult = serde_json::from_value(value)
        .map_err(|e| CoreError::malformed(format!("payload does not match schema: {e}")))?;

    tracing::debug!(
        points = result.heatmap.points.len(),
        findings = result.findings.len(),
        personas = result.persona_traces.len(),
        "analysis payload validated"
    );
    Ok(result)
}

/// Removes `null` object members so optional fields deserialize as absent.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
