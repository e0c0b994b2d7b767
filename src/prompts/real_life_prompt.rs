//! Real-life photographic image prompt

/// Generates the image prompt for the real-life style
///
/// # Examples
///
/// ```
/// use cruisesim::prompts::real_life_prompt::generate_real_life_prompt;
///
/// let prompt = generate_real_life_prompt("icon of the seas at sunset");
/// assert!(prompt.contains("icon of the seas at sunset"));
/// ```
pub fn generate_real_life_prompt(user_text: &str) -> String {
    format!(
        "A stunning, hyper-realistic professional photograph of a massive modern cruise ship from real life, {user_text}. \
Cinematic lighting, high resolution, 8k, detailed hull, luxury balconies, sunset ocean background, \
realistic water displacement, professional travel photography style."
    )
}
