//! Token counts for translated text, used for cost estimates.

use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// The o200k encoding used by the gpt-4o model family.
fn encoding() -> Option<&'static CoreBPE> {
    static ENCODING: OnceLock<Option<CoreBPE>> = OnceLock::new();
    ENCODING
        .get_or_init(|| match tiktoken_rs::o200k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                log::warn!("Token encoding unavailable, estimating counts: {}", e);
                None
            }
        })
        .as_ref()
}

/// Number of model tokens in `text`.
///
/// Falls back to one token per four characters if the encoding cannot be
/// loaded.
pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    match encoding() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => text.chars().count().div_ceil(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("hello world"), 2);
        assert!(count_tokens("Guten Morgen, wie geht es Ihnen?") > 4);
    }
}
