//! Prompt heuristics
//!
//! Plain substring rules that decide, per user message:
//! - whether an image should be generated ([`should_generate_image`])
//! - which rendering style to request ([`classify_style`])
//! - what to call the resulting ship ([`derive_ship_name`])
//!
//! The keyword lists are public constants so they can be inspected and
//! tested on their own.

use crate::style::StyleHint;

/// Substrings that request an image alongside the captain's reply
pub const IMAGE_TRIGGER_WORDS: &[&str] = &[
    "generate", "create", "build", "see", "show", "make", "image", "picture", "photo", "draw",
];

/// Substrings that select the real-life style over the blocky one
pub const REAL_LIFE_MARKERS: &[&str] = &[
    "real life",
    "realistic",
    "actual",
    "photo",
    "photography",
    "real world",
];

/// Tokens never used in a derived ship name
pub const NAME_STOP_WORDS: &[&str] = &[
    "generate", "create", "build", "see", "show", "make", "image", "picture", "photo", "draw",
    "a", "the", "of", "with", "real", "life", "roblox", "style",
];

/// Name used when a prompt has no usable words
pub const FALLBACK_SHIP_NAME: &str = "SS Discovery";

/// Substring that switches the name prefix from `SS` to `MS`
const MOTOR_SHIP_MARKER: &str = "real life";

/// Maximum number of prompt words kept in a ship name
const MAX_NAME_WORDS: usize = 3;

/// Shortest token length kept in a ship name
const MIN_NAME_WORD_LEN: usize = 3;

fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    needles.iter().any(|needle| lowered.contains(needle))
}

/// Returns true when the message asks to see a ship
///
/// Matching is case-insensitive and by substring, so "showcase" also
/// triggers.
///
/// # Examples
///
/// ```
/// use cruisesim::session::rules::should_generate_image;
///
/// assert!(should_generate_image("please draw one"));
/// assert!(!should_generate_image("I love ships"));
/// ```
pub fn should_generate_image(text: &str) -> bool {
    contains_any(text, IMAGE_TRIGGER_WORDS)
}

/// Picks the rendering style for a prompt
///
/// # Examples
///
/// ```
/// use cruisesim::session::rules::classify_style;
/// use cruisesim::style::StyleHint;
///
/// assert_eq!(classify_style("a REALISTIC liner"), StyleHint::RealLife);
/// assert_eq!(classify_style("a party boat"), StyleHint::Blocky);
/// ```
pub fn classify_style(text: &str) -> StyleHint {
    if contains_any(text, REAL_LIFE_MARKERS) {
        StyleHint::RealLife
    } else {
        StyleHint::Blocky
    }
}

/// Derives a ship display name from the raw prompt
///
/// The prompt is lower-cased, stripped of everything except ASCII word
/// characters and whitespace, and split into words. Stop words and words of
/// two characters or fewer are dropped. The first three remaining words are
/// capitalized and prefixed with `MS` when the prompt mentions "real life",
/// `SS` otherwise.
///
/// # Examples
///
/// ```
/// use cruisesim::session::rules::derive_ship_name;
///
/// assert_eq!(
///     derive_ship_name("Build a futuristic neon cruise ship"),
///     "SS Futuristic Neon Cruise"
/// );
/// assert_eq!(
///     derive_ship_name("show me a real life titanic replica"),
///     "MS Titanic Replica"
/// );
/// assert_eq!(derive_ship_name("go"), "SS Discovery");
/// ```
pub fn derive_ship_name(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || is_separator(*c))
        .collect();

    let words: Vec<String> = cleaned
        .split(is_separator)
        .filter(|word| word.len() >= MIN_NAME_WORD_LEN && !NAME_STOP_WORDS.contains(word))
        .take(MAX_NAME_WORDS)
        .map(capitalize)
        .collect();

    if words.is_empty() {
        return FALLBACK_SHIP_NAME.to_string();
    }

    let prefix = if lowered.contains(MOTOR_SHIP_MARKER) {
        "MS"
    } else {
        "SS"
    };
    format!("{} {}", prefix, words.join(" "))
}

/// Word separators for name derivation: Unicode White_Space without NEL,
/// plus the byte order mark
fn is_separator(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{feff}'
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
