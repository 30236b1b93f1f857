//! Consolidation of generated prompts into one copyable artifact.

use crate::api::GeneratedPrompt;

/// Join prompt sections into the single text block shown to the user and
/// copied verbatim to the clipboard.
///
/// Each section becomes an upper-cased comment header (underscores read as
/// spaces) followed by its text and a blank line; input order is preserved
/// and trailing whitespace is trimmed. An empty input yields an empty
/// string, which callers treat as "nothing to display".
pub fn consolidate_prompts(prompts: &[GeneratedPrompt]) -> String {
    let mut artifact = String::new();
    for prompt in prompts {
        let header = prompt.prompt_type.replace('_', " ").to_uppercase();
        artifact.push_str(&format!("<!-- {} -->\n{}\n\n", header, prompt.prompt_text));
    }
    artifact.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(prompt_type: &str, prompt_text: &str) -> GeneratedPrompt {
        GeneratedPrompt {
            prompt_type: prompt_type.to_string(),
            prompt_text: prompt_text.to_string(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(consolidate_prompts(&[]), "");
    }

    #[test]
    fn test_single_prompt_block() {
        let prompts = [prompt("color_palette", "Blue and white")];
        assert_eq!(
            consolidate_prompts(&prompts),
            "<!-- COLOR PALETTE -->\nBlue and white"
        );
    }

    #[test]
    fn test_blocks_follow_input_order() {
        let prompts = [
            prompt("layout", "Two-column grid"),
            prompt("color_palette", "Blue and white"),
            prompt("typography", "Sans-serif headings"),
        ];
        assert_eq!(
            consolidate_prompts(&prompts),
            "<!-- LAYOUT -->\nTwo-column grid\n\n\
             <!-- COLOR PALETTE -->\nBlue and white\n\n\
             <!-- TYPOGRAPHY -->\nSans-serif headings"
        );
    }

    #[test]
    fn test_identical_input_is_deterministic() {
        let prompts = [prompt("layout", "Grid"), prompt("spacing", "8px scale")];
        assert_eq!(consolidate_prompts(&prompts), consolidate_prompts(&prompts));
    }
}
