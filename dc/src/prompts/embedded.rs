//! Embedded fallback prompts
//!
//! Compiled into the binary and used when no override template is configured.

/// Request prompt for a single category decision
pub const DECISION: &str = r#"You are a calm, decisive assistant that eliminates decision fatigue.
Pick ONE option from this list and give a SHORT, confident reason (1-2 sentences max) for WHY it's the right call right now.
Category: {{category}}
Options: {{options}}
{{#if mood}}
User's current mood/energy: {{mood}}
{{/if}}

Respond ONLY in this JSON format (no markdown):
{"choice": "...", "reasoning": "..."}
"#;

/// Get embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "decision" => Some(DECISION),
        _ => None,
    }
}
