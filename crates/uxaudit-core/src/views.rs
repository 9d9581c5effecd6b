//! Deterministic mapping from a validated [`AnalysisResult`] to the
//! view-models the presentation layer renders.
//!
//! Everything here is pure formatting; no values are recomputed or re-ranked.

use crate::types::{AnalysisResult, HeatmapPoint};

/// Halo radius, in grid units, for a point of weight 1.
pub const HALO_RADIUS_AT_FULL_WEIGHT: f64 = 140.0;

/// Grid coordinate past which the tooltip flips to the other side.
pub const TOOLTIP_FLIP_THRESHOLD: f64 = 700.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditViews {
    pub heatmap: HeatmapView,
    pub findings: Vec<FindingCard>,
    pub personas: Vec<PersonaCard>,
    /// `None` suppresses the debate section.
    pub debates: Option<Vec<DebateCard>>,
    pub ab_tests: Vec<AbTestCard>,
    pub plan: Vec<PlanItem>,
    pub report: ReportView,
    pub log: Vec<LogLine>,
    pub layer_notes: Vec<(&'static str, String)>,
}

impl AuditViews {
    #[must_use]
    pub fn from_result(result: &AnalysisResult) -> Self {
        let debates = result
            .agent_debates
            .as_ref()
            .filter(|d| !d.is_empty())
            .map(|debates| {
                debates
                    .iter()
                    .map(|d| DebateCard {
                        initials: d.agents.iter().filter_map(|a| a.chars().next()).collect(),
                        agents: d.agents.clone(),
                        topic: d.topic.clone(),
                        conflict: d.conflict.clone(),
                        resolution: d.resolution.clone(),
                    })
                    .collect()
            });

        let layer_notes = [
            ("Hierarchy", &result.audit_hierarchy),
            ("Heuristics", &result.audit_bible),
            ("Cognitive load", &result.audit_cognitive),
            ("Accessibility", &result.audit_accessibility),
            ("Persona", &result.audit_persona),
            ("Mobile", &result.audit_mobile),
        ]
        .into_iter()
        .filter_map(|(label, note)| {
            note.as_ref()
                .filter(|n| !n.trim().is_empty())
                .map(|n| (label, n.clone()))
        })
        .collect();

        Self {
            heatmap: HeatmapView {
                confidence_level: result.heatmap.confidence_level.clone(),
                markers: result.heatmap.points.iter().map(HeatmapMarker::from).collect(),
            },
            findings: result
                .findings
                .iter()
                .map(|f| FindingCard {
                    title: f.title.clone(),
                    agent: f.agent.clone(),
                    observation: f.observation.clone(),
                    visual_evidence: f.visual_evidence.clone(),
                    impact_score: f.impact_score,
                    confidence_pct: percent(f.confidence_score),
                })
                .collect(),
            personas: result
                .persona_traces
                .iter()
                .map(|t| PersonaCard {
                    persona_type: t.persona_type.clone(),
                    primary_goal: t.primary_goal.clone(),
                    path: t.interaction_path.join(" → "),
                    friction_points: t.cognitive_friction_points.clone(),
                    success_pct: percent(t.success_probability),
                    error_rate: format!("{:.1}%", t.error_rate * 100.0),
                    time_to_task: format!("{:.1}s", t.time_to_task_ms / 1000.0),
                })
                .collect(),
            debates,
            ab_tests: result
                .ab_tests
                .iter()
                .flatten()
                .enumerate()
                .map(|(idx, t)| AbTestCard {
                    id: non_blank(t.id.as_deref()).unwrap_or_else(|| format!("SWARM_{idx}")),
                    hypothesis: non_blank(Some(t.hypothesis.as_str()))
                        .unwrap_or_else(|| "Pending Hypothesis".to_owned()),
                    expected_lift: non_blank(Some(t.expected_lift.as_str()))
                        .unwrap_or_else(|| "0%".to_owned()),
                    priority: non_blank(t.priority.as_deref())
                        .unwrap_or_else(|| "Medium".to_owned()),
                    control: non_blank(Some(t.test_setup.control.as_str()))
                        .unwrap_or_else(|| "N/A".to_owned()),
                    variant: non_blank(Some(t.test_setup.variant_a.as_str()))
                        .unwrap_or_else(|| "N/A".to_owned()),
                    swarm_summary: t.swarm_summary.clone(),
                })
                .collect(),
            plan: result
                .strategic_plan
                .iter()
                .flatten()
                .map(|a| PlanItem {
                    tier: PriorityTier::from_label(&a.priority),
                    priority: a.priority.clone(),
                    issue: a.issue.clone(),
                    root_cause: a.root_cause.clone(),
                    recommended_fix: a.recommended_fix.clone(),
                    expected_impact: a.expected_impact.clone(),
                    owner_initial: a.owner_agent.trim().chars().next().unwrap_or('A'),
                    owner_agent: non_blank(Some(a.owner_agent.as_str()))
                        .unwrap_or_else(|| "System".to_owned()),
                })
                .collect(),
            report: ReportView {
                executive_summary: result.report.executive_summary.clone(),
                agents_deployed: result.report.methodology.agents_deployed.clone(),
                analysis_framework: result.report.methodology.analysis_framework.clone(),
                confidence_pct: percent(result.report.methodology.confidence_level),
                critical_blockers: result.report.key_findings.critical_blockers.clone(),
                quick_wins: result.report.key_findings.quick_wins.clone(),
            },
            log: result
                .logs
                .iter()
                .flatten()
                .map(|line| LogLine::parse(line))
                .collect(),
            layer_notes,
        }
    }
}

/// `0.82` → `82`.
fn percent(unit: f64) -> u32 {
    // Inputs are validated to [0, 1] before they reach here.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (unit * 100.0).round().clamp(0.0, 100.0) as u32;
    pct
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub confidence_level: Option<String>,
    pub markers: Vec<HeatmapMarker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Tooltip extends right/down from the marker.
    After,
    /// Tooltip extends left/up (marker is past the flip threshold).
    Before,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMarker {
    pub label: String,
    pub reasoning: String,
    pub x: f64,
    pub y: f64,
    /// Horizontal position as a percentage of the image width.
    pub left_pct: f64,
    /// Vertical position as a percentage of the image height.
    pub top_pct: f64,
    pub weight: f64,
    pub halo_radius: f64,
    pub fixation_ms: f64,
    pub anchor_x: Anchor,
    pub anchor_y: Anchor,
}

impl From<&HeatmapPoint> for HeatmapMarker {
    fn from(p: &HeatmapPoint) -> Self {
        let anchor = |v: f64| {
            if v > TOOLTIP_FLIP_THRESHOLD {
                Anchor::Before
            } else {
                Anchor::After
            }
        };
        Self {
            label: p.label.clone(),
            reasoning: p.reasoning.clone(),
            x: p.x,
            y: p.y,
            left_pct: p.x / 10.0,
            top_pct: p.y / 10.0,
            weight: p.weight,
            halo_radius: HALO_RADIUS_AT_FULL_WEIGHT * p.weight,
            fixation_ms: p.predicted_fixation_time_ms,
            anchor_x: anchor(p.x),
            anchor_y: anchor(p.y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindingCard {
    pub title: String,
    pub agent: String,
    pub observation: String,
    pub visual_evidence: String,
    pub impact_score: f64,
    pub confidence_pct: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaCard {
    pub persona_type: String,
    pub primary_goal: String,
    pub path: String,
    pub friction_points: Vec<String>,
    pub success_pct: u32,
    pub error_rate: String,
    pub time_to_task: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebateCard {
    pub agents: Vec<String>,
    pub initials: String,
    pub topic: String,
    pub conflict: String,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbTestCard {
    pub id: String,
    pub hypothesis: String,
    pub expected_lift: String,
    pub priority: String,
    pub control: String,
    pub variant: String,
    pub swarm_summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    Critical,
    High,
    Normal,
}

impl PriorityTier {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => PriorityTier::Critical,
            "high" => PriorityTier::High,
            _ => PriorityTier::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub tier: PriorityTier,
    pub priority: String,
    pub issue: String,
    pub root_cause: String,
    pub recommended_fix: String,
    pub expected_impact: String,
    pub owner_agent: String,
    pub owner_initial: char,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub executive_summary: String,
    pub agents_deployed: Vec<String>,
    pub analysis_framework: String,
    pub confidence_pct: u32,
    pub critical_blockers: Vec<String>,
    pub quick_wins: Vec<String>,
}

/// An agent log line, optionally attributed as `AGENT → message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub agent: Option<String>,
    pub message: String,
}

impl LogLine {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.split_once('→') {
            Some((agent, message)) => Self {
                agent: Some(agent.trim().to_owned()),
                message: message.trim().to_owned(),
            },
            None => Self {
                agent: None,
                message: line.to_owned(),
            },
        }
    }
}
