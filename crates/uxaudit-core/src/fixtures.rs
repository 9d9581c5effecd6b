//! Shared payload fixtures for unit tests.

use serde_json::{json, Value};

use crate::types::AnalysisResult;

/// A complete, schema-valid payload with 8 fixation points.
pub(crate) fn full_payload() -> Value {
    let points: Vec<Value> = (0..8)
        .map(|i| {
            json!({
                "x": 100 * i + 50,
                "y": 900 - 100 * i,
                "weight": f64::from(i) / 8.0 + 0.05,
                "label": format!("element-{i}"),
                "reasoning": format!("fixation cluster {i}"),
                "predicted_fixation_time_ms": 180 + 40 * i
            })
        })
        .collect();

    json!({
        "logs": [
            "AGENT_FITTS → primary CTA below fold at [512, 880]",
            "swarm converged after 3 rounds"
        ],
        "heatmap": {
            "coordinate_system": "0-1000 pixel grid",
            "confidence_level": "high",
            "points": points
        },
        "findings": [
            {
                "title": "Low-contrast secondary navigation",
                "agent": "WCAG_AUDITOR",
                "observation": "Nav labels fall below 4.5:1 contrast.",
                "visual_evidence": "Top nav bar [120, 40] to [880, 60]",
                "impact_score": 3,
                "confidence_score": 0.87
            }
        ],
        "persona_traces": [
            {
                "persona_type": "Aging / Low-Vision",
                "primary_goal": "Find pricing",
                "interaction_path": ["Landing", "Nav", "Pricing"],
                "cognitive_friction_points": ["Small nav text"],
                "success_probability": 0.625,
                "time_to_task_ms": 14500,
                "error_rate": 0.1234
            }
        ],
        "agent_debates": [
            {
                "agents": ["Hick", "Jakob"],
                "topic": "Menu depth",
                "conflict": "Fewer choices vs. familiar layout",
                "resolution": "Keep familiar layout, collapse rare items"
            }
        ],
        "ab_tests": [
            {
                "id": "AB-1",
                "hypothesis": "Raising CTA contrast lifts sign-ups",
                "test_setup": { "control": "Grey CTA", "variant_a": "Orange CTA" },
                "expected_lift": "12%",
                "priority": "High",
                "swarm_summary": "41 of 50 agents located the CTA faster"
            },
            {
                "hypothesis": "",
                "test_setup": {},
                "expected_lift": "",
                "swarm_summary": "no measurable delta"
            }
        ],
        "strategic_plan": [
            {
                "priority": "Critical",
                "issue": "CTA below fold",
                "root_cause": "Hero image height",
                "recommended_fix": "Cap hero at 60vh",
                "expected_impact": "+8% conversions",
                "owner_agent": "fitts_agent"
            },
            {
                "priority": "low",
                "issue": "Footer clutter",
                "root_cause": "Legacy links",
                "recommended_fix": "Group links",
                "expected_impact": "Cleaner scan path",
                "owner_agent": ""
            }
        ],
        "report": {
            "executive_summary": "The interface hides its primary action.",
            "methodology": {
                "agents_deployed": ["WCAG_AUDITOR", "FITTS", "HICK"],
                "analysis_framework": "Nielsen heuristics + WCAG 2.2",
                "confidence_level": 0.82
            },
            "key_findings": {
                "critical_blockers": ["CTA below fold"],
                "quick_wins": ["Raise nav contrast"]
            }
        }
    })
}

pub(crate) fn full_result() -> AnalysisResult {
    crate::parse_analysis(Some(full_payload().to_string().as_str())).expect("fixture must validate")
}
