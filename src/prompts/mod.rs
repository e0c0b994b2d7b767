//! Prompts for the captain persona and ship renders
//!
//! This module provides the system instruction that shapes the captain's
//! replies and the style-specific prompts sent to the image model.

pub mod blocky_prompt;
pub mod real_life_prompt;

use crate::style::StyleHint;

/// System instruction for the text model
pub const CAPTAIN_SYSTEM_PROMPT: &str = r#"You are the Virtual Captain of the Cruise Ship Simulator.
Your goal is to help users conceptualize and design cruise ships.
You have two modes:
1. Blocky Mode: Focus on blocky models, vibrant colors, and low-poly structures.
2. Real-Life Mode: Focus on engineering, massive scale, luxury aesthetics, and realistic naval architecture.

Use a friendly, enthusiastic, and nautical tone.
If a user asks for real-life ships, provide facts and inspiration from actual famous vessels (like Icon of the Seas or Titanic).
If they ask to "generate", "create", or "see" a ship, explain that you are preparing the visual concepts."#;

/// Opening line shown before the first user turn
pub const DEFAULT_GREETING: &str = "Ahoy there, matey! I'm Captain Block. Ready to design the ultimate vessel? I can do blocky toy-style builds or show you realistic ships from real life! What are we launching today?";

/// Builds the image prompt for a style
///
/// The raw user text is embedded verbatim in the style template.
///
/// # Examples
///
/// ```
/// use cruisesim::prompts::build_image_prompt;
/// use cruisesim::style::StyleHint;
///
/// let prompt = build_image_prompt(StyleHint::RealLife, "a ship with three pools");
/// assert!(prompt.contains("a ship with three pools"));
/// assert!(prompt.contains("photograph"));
/// ```
pub fn build_image_prompt(style: StyleHint, user_text: &str) -> String {
    match style {
        StyleHint::Blocky => blocky_prompt::generate_blocky_prompt(user_text),
        StyleHint::RealLife => real_life_prompt::generate_real_life_prompt(user_text),
    }
}
