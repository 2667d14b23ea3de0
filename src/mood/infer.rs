//! Prompt template and mood extraction.

/// Build the fixed prompt asking the generator for a short mood phrase.
pub fn mood_prompt(caption: &str) -> String {
    format!(
        "What kind of music or emotion does this describe: '{}'? Reply in 2-3 words.",
        caption
    )
}

/// Extract the mood phrase from generated text.
///
/// Takes the trimmed substring after the last `:`, or the whole trimmed
/// string when no colon is present. Always returns a string, possibly empty;
/// the generated text is never validated.
pub fn extract_mood(generated: &str) -> String {
    match generated.rsplit_once(':') {
        Some((_, tail)) => tail.trim().to_string(),
        None => generated.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_takes_text_after_last_colon() {
        assert_eq!(extract_mood("a: b: happy jazz"), "happy jazz");
    }

    #[test]
    fn test_extract_without_colon_returns_whole_string() {
        assert_eq!(extract_mood("no colon here"), "no colon here");
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(extract_mood("  mellow blues \n"), "mellow blues");
        assert_eq!(extract_mood("mood:   calm piano  "), "calm piano");
    }

    #[test]
    fn test_extract_can_be_empty() {
        assert_eq!(extract_mood("trailing colon:"), "");
        assert_eq!(extract_mood(""), "");
    }

    #[test]
    fn test_prompt_embeds_caption() {
        let prompt = mood_prompt("a dog on the beach");
        assert!(prompt.contains("'a dog on the beach'"));
        assert!(prompt.ends_with("Reply in 2-3 words."));
    }
}
