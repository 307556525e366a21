//! The fixed instruction template sent with every text unit.

/// System message for a target language.
pub fn system_prompt(target_language: &str) -> String {
    format!(
        "You are a helpful assistant translating to {}.",
        target_language
    )
}

/// User message: the instruction, parameterized only by the target language,
/// followed by the raw text.
pub fn user_prompt(target_language: &str, text: &str) -> String {
    format!(
        "Translate the following text to {}, preserving meaning and context. \
         Do not translate personal names or trademarked terms. \
         If it's an email address or URL, leave it unchanged. \
         Reply with the translation only.\n\nText:\n{}",
        target_language, text
    )
}
