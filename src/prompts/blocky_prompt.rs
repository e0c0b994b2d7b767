//! Blocky toy-style image prompt
//!
//! Renders the ship as a polished low-poly simulator build.

/// Generates the image prompt for the blocky style
///
/// # Examples
///
/// ```
/// use cruisesim::prompts::blocky_prompt::generate_blocky_prompt;
///
/// let prompt = generate_blocky_prompt("a pirate themed cruise ship");
/// assert!(prompt.contains("a pirate themed cruise ship"));
/// ```
pub fn generate_blocky_prompt(user_text: &str) -> String {
    format!(
        "A high-quality blocky toy-style cruise ship, {user_text}. \
Aesthetic: blocky shapes, vibrant colors, little block-figure passengers on deck, \
shining ocean, simulator game vibes, 3D render, vibrant lighting, low-poly but polished."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocky_prompt_embeds_text() {
        let prompt = generate_blocky_prompt("with a water slide");
        assert!(prompt.contains(", with a water slide."));
    }

    #[test]
    fn test_blocky_prompt_describes_aesthetic() {
        let prompt = generate_blocky_prompt("ship");
        assert!(prompt.contains("low-poly"));
        assert!(prompt.contains("vibrant colors"));
        assert!(!prompt.contains("photograph"));
    }
}
