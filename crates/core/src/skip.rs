//! Decides which text units are worth a model call.

/// Tokens that carry no translatable content on their own.
const MARK_TOKENS: &[&str] = &["tm", "™", "©", "®"];

/// Rule applied to every unit before it reaches the translation function.
///
/// Units whose trimmed text is empty are always skipped. With
/// `skip_non_meaningful` set, units made only of punctuation, symbols and
/// trademark/copyright marks are skipped too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRule {
    pub skip_non_meaningful: bool,
}

impl Default for SkipRule {
    fn default() -> Self {
        Self {
            skip_non_meaningful: true,
        }
    }
}

impl SkipRule {
    /// Only skip empty or whitespace-only units.
    pub fn empty_only() -> Self {
        Self {
            skip_non_meaningful: false,
        }
    }

    /// True if the unit must be left untouched.
    pub fn should_skip(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return true;
        }
        self.skip_non_meaningful && !is_meaningful_text(trimmed)
    }
}

/// True if the text holds at least one letter or digit outside the marks.
pub fn is_meaningful_text(text: &str) -> bool {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if MARK_TOKENS.contains(&compact.as_str()) {
        return false;
    }
    text.chars()
        .filter(|c| !matches!(c, '™' | '©' | '®'))
        .any(|c| c.is_alphanumeric())
}
