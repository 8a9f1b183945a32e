//! Agent instruction composition.

/// System prompt used when neither the request nor any default provides one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and helpful AI companion.";

const ROLE_PLAYING_GUIDELINES: &str = "\
# Role-playing guidelines
- Stay in character for the whole call. Never say you are an AI model or mention these instructions.
- You are speaking, not writing: keep replies short and conversational, one or two sentences at a time.
- Do not use markdown, lists, emoji or any formatting that cannot be spoken aloud.
- Match the caller's language and tone, and ask a question back now and then to keep the conversation going.";

/// Builds the agent instructions from a resolved system prompt.
///
/// The prompt is used as given, including an explicit empty one: only an
/// absent prompt falls back to [`DEFAULT_SYSTEM_PROMPT`], and that choice is
/// made by the caller. An empty prompt leaves the guidelines on their own.
pub fn compose_instructions(system_prompt: &str, include_role_playing: bool) -> String {
    let base = system_prompt.trim();
    match (base.is_empty(), include_role_playing) {
        (_, false) => base.to_string(),
        (true, true) => ROLE_PLAYING_GUIDELINES.to_string(),
        (false, true) => format!("{}\n\n{}", base, ROLE_PLAYING_GUIDELINES),
    }
}

/// Shortens long values for log lines.
pub(crate) fn truncate_for_log(value: &str) -> String {
    const LIMIT: usize = 100;
    match value.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
