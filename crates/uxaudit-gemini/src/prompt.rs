//! The fixed instruction prompt sent with every audit.
//!
//! The constraint block at the end is rendered from the core response schema,
//! so the prompt and the validator cannot drift apart.

use uxaudit_core::schema;

/// Bumped whenever the instruction text changes in a way that can alter the
/// shape or tone of the model's reply.
pub const PROMPT_VERSION: &str = "swarm-audit/6";

/// Size of the simulated persona population.
pub const SWARM_SIZE: u32 = 50;

/// Number of fixation points the heatmap must contain.
pub const HEATMAP_POINT_COUNT: usize = 8;

/// Persona distribution as `(segment, percent)`.
pub const PERSONA_MIX: [(&str, u8); 4] = [
    ("Power Users", 30),
    ("Casual/Standard", 40),
    ("Aging/Low-Vision", 20),
    ("Motor-Impaired", 10),
];

/// Final text part of the request, sent after the image.
pub const EXECUTE_INSTRUCTION: &str = "EXECUTE SWARM AUDIT. Trigger 50-persona simulation. \
Identify UX debt and spatial friction. GROUND ALL DATA IN PIXEL COORDINATES.";

/// Builds the full instruction prompt, constraint block included.
#[must_use]
pub fn instruction_prompt() -> String {
    let mix = PERSONA_MIX
        .iter()
        .map(|(segment, pct)| format!("{pct}% {segment}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "ROLE: Lead forensic UI/UX orchestrator and swarm commander (prompt {PROMPT_VERSION}).\n\
OBJECTIVE: Run a forensic UX deep-dive on the attached interface screenshot using a simulated persona swarm.\n\
\n\
SWARM PROTOCOL:\n\
1. Simulate {SWARM_SIZE} distinct synthetic personas ({mix}).\n\
2. Compare the interface as shown (control) against a hypothetical variant with your quick wins applied.\n\
3. Apply Miller's Law (7 plus or minus 2), Hick's Law (reaction time) and Fitts's Law (target acquisition) to every interactive element at its [x, y] position.\n\
\n\
AUDIT LAYERS:\n\
- Spatial inventory: map every component onto a 0-1000 coordinate grid.\n\
- Heuristic validation: WCAG 2.2 (AA/AAA), Jakob's Law and the aesthetic-usability effect.\n\
- Friction mapping: locate visual debt and interaction dead-ends where personas drop off.\n\
\n\
OUTPUT RULES:\n\
- Every finding cites visual evidence with 0-1000 grid coordinates.\n\
- Severity follows Nielsen's scale, 0 (none) to 4 (usability catastrophe).\n\
- The heatmap contains exactly {HEATMAP_POINT_COUNT} fixation points; weight and predicted_fixation_time_ms aggregate the behaviour of all {SWARM_SIZE} personas.\n\
- Reply with JSON only. No preamble, no commentary.\n\
\n\
FIELD CONSTRAINTS:\n"
    );
    for line in schema::constraint_lines() {
        prompt.push_str(&line);
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_mix_covers_the_whole_swarm() {
        let total: u32 = PERSONA_MIX.iter().map(|(_, pct)| u32::from(*pct)).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn prompt_names_version_and_point_count() {
        let prompt = instruction_prompt();
        assert!(prompt.contains(PROMPT_VERSION));
        assert!(prompt.contains("exactly 8 fixation points"));
        assert!(prompt.contains("30% Power Users"));
    }

    #[test]
    fn prompt_carries_every_schema_constraint() {
        let prompt = instruction_prompt();
        for line in schema::constraint_lines() {
            assert!(prompt.contains(&line), "missing constraint line: {line}");
        }
    }

    #[test]
    fn prompt_is_stable_across_calls() {
        assert_eq!(instruction_prompt(), instruction_prompt());
    }
}
