//! Social share content derivation.
//!
//! Pure string rules turning the image caption into a display caption, a
//! hashtag line, and a canned quote. No model calls, no state; running these
//! twice on the same caption yields identical output.

use serde::Serialize;

const EMOJI_SUFFIX: &str = " 🎶📷";
const DEFAULT_HASHTAG: &str = "#snaptune";
const DEFAULT_QUOTE: &str = "Every picture tells a story – make yours worth hearing.";

/// Keyword-to-quote dispatch table; first match wins.
const QUOTES: &[(&str, &str)] = &[
    ("flower", "Let yourself bloom like the flowers."),
    ("sunset", "Every sunset brings the promise of a new dawn."),
    ("beach", "Good vibes happen on the tides."),
    ("rain", "Some people feel the rain, others just get wet."),
];

/// Derived social share content for one caption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SocialContent {
    pub caption_line: String,
    pub hashtag_line: String,
    pub quote: String,
}

impl SocialContent {
    /// Derive all three pieces from the image caption.
    pub fn derive(caption: &str) -> Self {
        Self {
            caption_line: caption_line(caption),
            hashtag_line: hashtag_line(caption),
            quote: quote(caption),
        }
    }
}

/// Capitalize the caption's first letter and append the emoji suffix.
pub fn caption_line(caption: &str) -> String {
    let mut chars = caption.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{}{}", capitalized, EMOJI_SUFFIX)
}

/// Hashtags from the caption's words that are purely alphabetic and longer
/// than 3 characters. Falls back to a default tag when nothing qualifies.
pub fn hashtag_line(caption: &str) -> String {
    let tags: Vec<String> = caption
        .split_whitespace()
        // Character count, not byte length; accented words must measure the same
        .filter(|w| w.chars().count() > 3 && w.chars().all(|c| c.is_alphabetic()))
        .map(|w| format!("#{}", w))
        .collect();

    if tags.is_empty() {
        DEFAULT_HASHTAG.to_string()
    } else {
        tags.join(" ")
    }
}

/// Pick a quote by case-insensitive substring match against the fixed
/// keyword order. This is a first-match dispatch table, not a classifier.
pub fn quote(caption: &str) -> String {
    let lowered = caption.to_lowercase();
    QUOTES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, quote)| quote.to_string())
        .unwrap_or_else(|| DEFAULT_QUOTE.to_string())
}
