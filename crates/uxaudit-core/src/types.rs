//! Typed shape of a validated audit payload.
//!
//! Field names mirror the JSON keys the model is constrained to emit. Required
//! sections are plain fields; optional sections are `Option` and default to
//! `None` when the key is absent. Construct values through
//! [`crate::parse_analysis`] so the range checks in [`crate::schema`] apply.

use serde::{Deserialize, Serialize};

/// One completed forensic audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub heatmap: SaliencyMap,
    pub findings: Vec<Finding>,
    pub persona_traces: Vec<PersonaTrace>,
    pub report: ResearchReport,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_debates: Option<Vec<AgentDebate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ab_tests: Option<Vec<AbTestProposal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategic_plan: Option<Vec<StrategicAction>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_hierarchy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_bible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_cognitive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_accessibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_mobile: Option<String>,
}

/// Model-asserted attention map on the normalized 0-1000 grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaliencyMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_system: Option<String>,
    /// Qualitative confidence, e.g. `"high"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,
    pub points: Vec<HeatmapPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: f64,
    pub y: f64,
    /// Salience weight in `[0, 1]`.
    pub weight: f64,
    pub label: String,
    pub reasoning: String,
    pub predicted_fixation_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub agent: String,
    pub observation: String,
    /// Component name plus `[x, y]` grid coordinates.
    pub visual_evidence: String,
    pub impact_score: f64,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaTrace {
    pub persona_type: String,
    pub primary_goal: String,
    pub interaction_path: Vec<String>,
    #[serde(default)]
    pub cognitive_friction_points: Vec<String>,
    pub success_probability: f64,
    pub time_to_task_ms: f64,
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDebate {
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub conflict: String,
    #[serde(default)]
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbTestProposal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hypothesis: String,
    pub test_setup: TestSetup,
    pub expected_lift: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub swarm_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSetup {
    #[serde(default)]
    pub control: String,
    #[serde(default)]
    pub variant_a: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicAction {
    /// Nielsen severity label or number, e.g. `"critical"` or `"4"`.
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub recommended_fix: String,
    #[serde(default)]
    pub expected_impact: String,
    #[serde(default)]
    pub owner_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub executive_summary: String,
    pub methodology: Methodology,
    pub key_findings: KeyFindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    #[serde(default)]
    pub agents_deployed: Vec<String>,
    #[serde(default)]
    pub analysis_framework: String,
    pub confidence_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFindings {
    #[serde(default)]
    pub critical_blockers: Vec<String>,
    #[serde(default)]
    pub quick_wins: Vec<String>,
}
