/// Instructions used when the caller gives none
pub const DEFAULT_INSTRUCTIONS: &str = "Rewrite the following text into a professional, clear, and concise format.\n\
Keep the core meaning and intent, but make it more polished and appropriate for email communication.";

const OUTPUT_DIRECTIVE: &str =
    "Return only the formatted text, without any additional commentary or labels.";

/// Missing or empty instructions fall back to [`DEFAULT_INSTRUCTIONS`]; anything else is used as given.
pub fn resolve_instructions(instructions: Option<&str>) -> &str {
    match instructions {
        Some(instructions) if !instructions.is_empty() => instructions,
        _ => DEFAULT_INSTRUCTIONS,
    }
}

pub fn build_prompt(text: &str, instructions: Option<&str>) -> String {
    format!(
        "{}\n\nOriginal text: \"{}\"\n\n{}",
        resolve_instructions(instructions),
        text,
        OUTPUT_DIRECTIVE
    )
}
