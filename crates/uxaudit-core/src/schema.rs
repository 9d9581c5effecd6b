//! Declarative response schema for the audit payload.
//!
//! [`ANALYSIS_SCHEMA`] is the only place the payload shape is written down.
//! Three consumers derive from it:
//!
//! - [`response_schema`] renders the Gemini `responseSchema` object sent with
//!   every request,
//! - [`constraint_lines`] renders the human-readable constraint block appended
//!   to the instruction prompt,
//! - [`check`] enforces required fields, JSON types and numeric ranges on the
//!   model's reply before it is deserialized into [`crate::AnalysisResult`].

use std::fmt;

use serde_json::{json, Map, Value};

/// Accepted range for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Any finite number.
    Any,
    /// `[0, 1]` (weights, probabilities, confidences).
    Unit,
    /// `[0, 1000]` (normalized grid coordinates).
    Grid,
    /// `>= 0` (durations).
    NonNegative,
}

impl Bound {
    fn limits(self) -> (Option<f64>, Option<f64>) {
        match self {
            Bound::Any => (None, None),
            Bound::Unit => (Some(0.0), Some(1.0)),
            Bound::Grid => (Some(0.0), Some(1000.0)),
            Bound::NonNegative => (Some(0.0), None),
        }
    }

    #[must_use]
    pub fn contains(self, n: f64) -> bool {
        if !n.is_finite() {
            return false;
        }
        let (min, max) = self.limits();
        min.is_none_or(|m| n >= m) && max.is_none_or(|m| n <= m)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Any => write!(f, "any number"),
            Bound::Unit => write!(f, "[0, 1]"),
            Bound::Grid => write!(f, "[0, 1000]"),
            Bound::NonNegative => write!(f, ">= 0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Object(&'static [Field]),
    Array(&'static Node),
    String,
    Number(Bound),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub node: Node,
    pub required: bool,
    pub description: Option<&'static str>,
}

const fn req(name: &'static str, node: Node) -> Field {
    Field {
        name,
        node,
        required: true,
        description: None,
    }
}

const fn opt(name: &'static str, node: Node) -> Field {
    Field {
        name,
        node,
        required: false,
        description: None,
    }
}

impl Field {
    const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

const STRING_LIST: Node = Node::Array(&Node::String);

const HEATMAP_POINT: Node = Node::Object(&[
    req("x", Node::Number(Bound::Grid)),
    req("y", Node::Number(Bound::Grid)),
    req("weight", Node::Number(Bound::Unit)).describe("0-1 salience weight"),
    req("label", Node::String),
    req("reasoning", Node::String),
    req("predicted_fixation_time_ms", Node::Number(Bound::NonNegative)),
]);

const HEATMAP: Node = Node::Object(&[
    opt("coordinate_system", Node::String).describe("0-1000 pixel grid"),
    opt("confidence_level", Node::String),
    req("points", Node::Array(&HEATMAP_POINT)),
]);

const FINDING: Node = Node::Object(&[
    req("title", Node::String),
    req("agent", Node::String),
    req("observation", Node::String),
    req("visual_evidence", Node::String).describe("Component and [x, y] coordinates"),
    req("impact_score", Node::Number(Bound::Any)),
    req("confidence_score", Node::Number(Bound::Unit)),
]);

const PERSONA_TRACE: Node = Node::Object(&[
    req("persona_type", Node::String),
    req("primary_goal", Node::String),
    req("interaction_path", STRING_LIST),
    opt("cognitive_friction_points", STRING_LIST),
    req("success_probability", Node::Number(Bound::Unit)),
    req("time_to_task_ms", Node::Number(Bound::NonNegative)),
    req("error_rate", Node::Number(Bound::Unit)),
]);

const AGENT_DEBATE: Node = Node::Object(&[
    opt("agents", STRING_LIST),
    opt("topic", Node::String),
    opt("conflict", Node::String),
    opt("resolution", Node::String),
]);

const TEST_SETUP: Node = Node::Object(&[
    opt("control", Node::String),
    opt("variant_a", Node::String),
]);

const AB_TEST: Node = Node::Object(&[
    opt("id", Node::String),
    req("hypothesis", Node::String),
    req("test_setup", TEST_SETUP),
    req("expected_lift", Node::String),
    opt("priority", Node::String),
    req("swarm_summary", Node::String).describe(
        "Aggregate delta between Control and Variant B across 50 simulated agents",
    ),
]);

const STRATEGIC_ACTION: Node = Node::Object(&[
    opt("priority", Node::String).describe("Nielsen Severity Scale 0-4"),
    opt("issue", Node::String),
    opt("root_cause", Node::String),
    opt("recommended_fix", Node::String),
    opt("expected_impact", Node::String),
    opt("owner_agent", Node::String),
]);

const METHODOLOGY: Node = Node::Object(&[
    opt("agents_deployed", STRING_LIST),
    opt("analysis_framework", Node::String),
    req("confidence_level", Node::Number(Bound::Unit)),
]);

const KEY_FINDINGS: Node = Node::Object(&[
    opt("critical_blockers", STRING_LIST),
    opt("quick_wins", STRING_LIST),
]);

const REPORT: Node = Node::Object(&[
    req("executive_summary", Node::String),
    req("methodology", METHODOLOGY),
    req("key_findings", KEY_FINDINGS),
]);

/// Root schema of the audit payload.
pub static ANALYSIS_SCHEMA: Node = Node::Object(&[
    req("heatmap", HEATMAP),
    req("findings", Node::Array(&FINDING)),
    req("persona_traces", Node::Array(&PERSONA_TRACE)),
    req("report", REPORT),
    opt("logs", STRING_LIST),
    opt("agent_debates", Node::Array(&AGENT_DEBATE)),
    opt("ab_tests", Node::Array(&AB_TEST)),
    opt("strategic_plan", Node::Array(&STRATEGIC_ACTION)),
    opt("audit_hierarchy", Node::String),
    opt("audit_bible", Node::String),
    opt("audit_cognitive", Node::String),
    opt("audit_accessibility", Node::String),
    opt("audit_persona", Node::String),
    opt("audit_mobile", Node::String),
]);

/// Renders [`ANALYSIS_SCHEMA`] as a Gemini `responseSchema` object.
#[must_use]
pub fn response_schema() -> Value {
    gemini_node(&ANALYSIS_SCHEMA, None)
}

fn gemini_node(node: &Node, description: Option<&str>) -> Value {
    let mut out = match node {
        Node::Object(fields) => {
            let mut properties = Map::new();
            for field in *fields {
                properties.insert(
                    field.name.to_owned(),
                    gemini_node(&field.node, field.description),
                );
            }
            let required: Vec<&str> = fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect();
            let ordering: Vec<&str> = fields.iter().map(|f| f.name).collect();
            let mut obj = json!({
                "type": "OBJECT",
                "properties": properties,
                "propertyOrdering": ordering,
            });
            if !required.is_empty() {
                obj["required"] = json!(required);
            }
            obj
        }
        Node::Array(item) => json!({ "type": "ARRAY", "items": gemini_node(item, None) }),
        Node::String => json!({ "type": "STRING" }),
        Node::Number(bound) => {
            let mut obj = json!({ "type": "NUMBER" });
            let (min, max) = bound.limits();
            if let Some(min) = min {
                obj["minimum"] = json!(min);
            }
            if let Some(max) = max {
                obj["maximum"] = json!(max);
            }
            obj
        }
    };
    if let Some(description) = description {
        out["description"] = json!(description);
    }
    out
}

/// One line per schema field, e.g.
/// `- heatmap.points[].weight: number in [0, 1], required (0-1 salience weight)`.
#[must_use]
pub fn constraint_lines() -> Vec<String> {
    let mut lines = Vec::new();
    if let Node::Object(fields) = ANALYSIS_SCHEMA {
        describe_fields(fields, "", &mut lines);
    }
    lines
}

fn describe_fields(fields: &[Field], prefix: &str, lines: &mut Vec<String>) {
    for field in fields {
        let path = join(prefix, field.name);
        let presence = if field.required {
            "required"
        } else {
            "optional"
        };
        let note = field
            .description
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        lines.push(format!(
            "- {path}: {}, {presence}{note}",
            type_label(&field.node)
        ));
        match field.node {
            Node::Object(children) => describe_fields(children, &path, lines),
            Node::Array(Node::Object(children)) => {
                describe_fields(children, &format!("{path}[]"), lines);
            }
            _ => {}
        }
    }
}

fn type_label(node: &Node) -> String {
    match node {
        Node::Object(_) => "object".to_owned(),
        Node::Array(item) => format!("array of {}", type_label(item)),
        Node::String => "string".to_owned(),
        Node::Number(Bound::Any) => "number".to_owned(),
        Node::Number(bound) => format!("number in {bound}"),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Checks `value` against `node`, returning a path-qualified reason on the
/// first violation.
///
/// `null` is treated as absent. Keys not named by the schema are ignored.
///
/// # Errors
///
/// Returns the reason string when a required field is missing, a value has
/// the wrong JSON type, or a number falls outside its [`Bound`].
pub fn check(node: &Node, value: &Value, path: &str) -> Result<(), String> {
    let at = if path.is_empty() { "<root>" } else { path };
    match node {
        Node::String => {
            if value.is_string() {
                Ok(())
            } else {
                Err(format!("`{at}` must be a string"))
            }
        }
        Node::Number(bound) => {
            let n = value
                .as_f64()
                .ok_or_else(|| format!("`{at}` must be a number"))?;
            if bound.contains(n) {
                Ok(())
            } else {
                Err(format!("`{at}` = {n} is outside {bound}"))
            }
        }
        Node::Array(item) => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("`{at}` must be an array"))?;
            for (idx, v) in items.iter().enumerate() {
                check(item, v, &format!("{path}[{idx}]"))?;
            }
            Ok(())
        }
        Node::Object(fields) => {
            let obj = value
                .as_object()
                .ok_or_else(|| format!("`{at}` must be an object"))?;
            for field in *fields {
                let child = join(path, field.name);
                match obj.get(field.name) {
                    None | Some(Value::Null) => {
                        if field.required {
                            return Err(format!("missing required field `{child}`"));
                        }
                    }
                    Some(v) => check(&field.node, v, &child)?,
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_requires_the_four_core_sections() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .expect("required list")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            vec!["heatmap", "findings", "persona_traces", "report"]
        );
    }

    #[test]
    fn gemini_schema_carries_bounds_and_descriptions() {
        let schema = response_schema();
        let weight = &schema["properties"]["heatmap"]["properties"]["points"]["items"]
            ["properties"]["weight"];
        assert_eq!(weight["type"], "NUMBER");
        assert_eq!(weight["minimum"], 0.0);
        assert_eq!(weight["maximum"], 1.0);
        assert_eq!(weight["description"], "0-1 salience weight");

        let x = &schema["properties"]["heatmap"]["properties"]["points"]["items"]["properties"]
            ["x"];
        assert_eq!(x["maximum"], 1000.0);
    }

    #[test]
    fn optional_sections_omit_required_key() {
        let schema = response_schema();
        let debate = &schema["properties"]["agent_debates"]["items"];
        assert_eq!(debate["type"], "OBJECT");
        assert!(debate.get("required").is_none());
    }

    #[test]
    fn constraint_lines_cover_nested_array_fields() {
        let lines = constraint_lines();
        assert!(lines
            .iter()
            .any(|l| l.starts_with("- heatmap.points[].weight: number in [0, 1], required")));
        assert!(lines
            .iter()
            .any(|l| l == "- persona_traces[].interaction_path: array of string, required"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("- agent_debates: array of object, optional")));
    }

    #[test]
    fn bound_rejects_non_finite_and_out_of_range() {
        assert!(Bound::Unit.contains(0.0));
        assert!(Bound::Unit.contains(1.0));
        assert!(!Bound::Unit.contains(1.01));
        assert!(!Bound::Grid.contains(-1.0));
        assert!(Bound::NonNegative.contains(1e9));
        assert!(!Bound::Any.contains(f64::NAN));
    }

    #[test]
    fn check_reports_path_of_nested_violation() {
        let value = json!({ "points": [ { "x": 10, "y": 1200, "weight": 0.5,
            "label": "cta", "reasoning": "r", "predicted_fixation_time_ms": 10 } ] });
        let err = check(&HEATMAP, &value, "heatmap").unwrap_err();
        assert!(err.contains("heatmap.points[0].y"), "got: {err}");
    }

    #[test]
    fn check_treats_null_as_absent() {
        let value = json!({ "coordinate_system": null, "points": [] });
        assert!(check(&HEATMAP, &value, "heatmap").is_ok());

        let value = json!({ "points": null });
        let err = check(&HEATMAP, &value, "heatmap").unwrap_err();
        assert_eq!(err, "missing required field `heatmap.points`");
    }
}
