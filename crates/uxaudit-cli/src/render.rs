//! Markdown and JSON rendering of a validated audit.

use std::fmt::{self, Write as _};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use uxaudit_core::views::{Anchor, PriorityTier};
use uxaudit_core::{parse_analysis, AnalysisResult, AuditViews};

use crate::OutputFormat;

/// Validates a saved reply offline and renders it.
///
/// A payload that fails validation prints the failure banner and yields
/// `ExitCode::FAILURE`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdout cannot be written.
pub(crate) fn run_render(path: &Path, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match parse_analysis(Some(raw.as_str())) {
        Ok(result) => {
            print_result(&result, format, &path.display().to_string())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(error = %err, file = %path.display(), "saved payload rejected");
            eprintln!("Node Failure: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints `result` to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization or Markdown formatting fails.
pub(crate) fn print_result(
    result: &AnalysisResult,
    format: OutputFormat,
    source: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => {
            let generated = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
            let views = AuditViews::from_result(result);
            print!("{}", markdown_report(&views, source, &generated)?);
        }
    }
    Ok(())
}

/// Renders every populated section of `views` as one Markdown document.
/// Optional sections that are absent or empty are left out entirely.
#[allow(clippy::too_many_lines)]
pub(crate) fn markdown_report(
    views: &AuditViews,
    source: &str,
    generated: &str,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let report = &views.report;

    writeln!(out, "# Forensic UX Audit")?;
    writeln!(out)?;
    writeln!(out, "**Source**: {source}")?;
    writeln!(out, "**Generated**: {generated}")?;
    writeln!(out, "**Confidence**: {}%", report.confidence_pct)?;
    if !report.analysis_framework.is_empty() {
        writeln!(out, "**Framework**: {}", report.analysis_framework)?;
    }
    if !report.agents_deployed.is_empty() {
        writeln!(out, "**Agents**: {}", report.agents_deployed.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;

    writeln!(out, "## Executive Summary")?;
    writeln!(out)?;
    writeln!(out, "{}", report.executive_summary)?;
    bullet_section(&mut out, "### Critical Blockers", &report.critical_blockers)?;
    bullet_section(&mut out, "### Quick Wins", &report.quick_wins)?;

    writeln!(out)?;
    writeln!(out, "## Saliency Heatmap")?;
    writeln!(out)?;
    if let Some(confidence) = &views.heatmap.confidence_level {
        writeln!(out, "Confidence: {confidence}")?;
        writeln!(out)?;
    }
    writeln!(out, "| # | Element | Grid (x, y) | Weight | Fixation | Halo | Tooltip |")?;
    writeln!(out, "|---|---------|-------------|--------|----------|------|---------|")?;
    for (idx, m) in views.heatmap.markers.iter().enumerate() {
        writeln!(
            out,
            "| {} | {} | ({}, {}) | {:.2} | {}ms | {:.0} | {} |",
            idx + 1,
            cell(&m.label),
            m.x,
            m.y,
            m.weight,
            m.fixation_ms,
            m.halo_radius,
            tooltip_corner(m.anchor_x, m.anchor_y),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Findings")?;
    for f in &views.findings {
        writeln!(out)?;
        writeln!(out, "### {}", f.title)?;
        writeln!(out)?;
        writeln!(out, "- **Agent**: {}", f.agent)?;
        writeln!(out, "- **Impact**: {}", f.impact_score)?;
        writeln!(out, "- **Confidence**: {}%", f.confidence_pct)?;
        writeln!(out, "- **Evidence**: {}", f.visual_evidence)?;
        writeln!(out)?;
        writeln!(out, "{}", f.observation)?;
    }

    writeln!(out)?;
    writeln!(out, "## Persona Traces")?;
    writeln!(out)?;
    writeln!(out, "| Persona | Goal | Success | Error Rate | Time | Path |")?;
    writeln!(out, "|---------|------|---------|------------|------|------|")?;
    for p in &views.personas {
        writeln!(
            out,
            "| {} | {} | {}% | {} | {} | {} |",
            cell(&p.persona_type),
            cell(&p.primary_goal),
            p.success_pct,
            p.error_rate,
            p.time_to_task,
            cell(&p.path),
        )?;
    }
    for p in views.personas.iter().filter(|p| !p.friction_points.is_empty()) {
        writeln!(out)?;
        writeln!(out, "Friction for {}: {}", p.persona_type, p.friction_points.join("; "))?;
    }

    if let Some(debates) = &views.debates {
        writeln!(out)?;
        writeln!(out, "## Agent Debates")?;
        for d in debates {
            writeln!(out)?;
            writeln!(out, "### [{}] {}", d.initials, d.topic)?;
            writeln!(out)?;
            writeln!(out, "- **Agents**: {}", d.agents.join(" vs "))?;
            writeln!(out, "- **Conflict**: {}", d.conflict)?;
            writeln!(out, "- **Resolution**: {}", d.resolution)?;
        }
    }

    if !views.ab_tests.is_empty() {
        writeln!(out)?;
        writeln!(out, "## A/B Test Proposals")?;
        for t in &views.ab_tests {
            writeln!(out)?;
            writeln!(out, "### {}: {}", t.id, t.hypothesis)?;
            writeln!(out)?;
            writeln!(out, "- **Expected lift**: {}", t.expected_lift)?;
            writeln!(out, "- **Priority**: {}", t.priority)?;
            writeln!(out, "- **Control**: {}", t.control)?;
            writeln!(out, "- **Variant**: {}", t.variant)?;
            if !t.swarm_summary.is_empty() {
                writeln!(out, "- **Swarm summary**: {}", t.swarm_summary)?;
            }
        }
    }

    if !views.plan.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Strategic Plan")?;
        writeln!(out)?;
        writeln!(out, "| Priority | Issue | Root Cause | Fix | Impact | Owner |")?;
        writeln!(out, "|----------|-------|------------|-----|--------|-------|")?;
        for item in &views.plan {
            let priority = match item.tier {
                PriorityTier::Critical => format!("**{}**", cell(&item.priority)),
                PriorityTier::High => format!("_{}_", cell(&item.priority)),
                PriorityTier::Normal => cell(&item.priority),
            };
            let owner = format!("({}) {}", item.owner_initial, cell(&item.owner_agent));
            writeln!(
                out,
                "| {priority} | {} | {} | {} | {} | {owner} |",
                cell(&item.issue),
                cell(&item.root_cause),
                cell(&item.recommended_fix),
                cell(&item.expected_impact),
            )?;
        }
    }

    if !views.layer_notes.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Audit Layers")?;
        for (label, note) in &views.layer_notes {
            writeln!(out)?;
            writeln!(out, "### {label}")?;
            writeln!(out)?;
            writeln!(out, "{note}")?;
        }
    }

    if !views.log.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Agent Log")?;
        writeln!(out)?;
        for line in &views.log {
            match &line.agent {
                Some(agent) => writeln!(out, "- `{agent}` {}", line.message)?,
                None => writeln!(out, "- {}", line.message)?,
            }
        }
    }

    Ok(out)
}

fn bullet_section(out: &mut String, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{heading}")?;
    writeln!(out)?;
    for item in items {
        writeln!(out, "- {item}")?;
    }
    Ok(())
}

fn tooltip_corner(x: Anchor, y: Anchor) -> &'static str {
    match (x, y) {
        (Anchor::After, Anchor::After) => "below right",
        (Anchor::Before, Anchor::After) => "below left",
        (Anchor::After, Anchor::Before) => "above right",
        (Anchor::Before, Anchor::Before) => "above left",
    }
}

/// Keeps free text inside one Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}
