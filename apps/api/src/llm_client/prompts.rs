// Cross-cutting prompt fragments. Each feature keeps its own prompts.rs next to it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{snake_case}` placeholders. JSON braces in templates never match.
static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Appended to every system prompt so the reply can go straight into `serde_json`.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds a system prompt from a persona line plus the JSON-only rule.
pub fn json_system(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_INSTRUCTION}")
}

/// Fills `{name}` placeholders in one pass over `template`. Substituted values
/// are never rescanned, so user text containing `{answer}` stays literal.
/// Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
