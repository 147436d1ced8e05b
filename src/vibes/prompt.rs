use strum::IntoEnumIterator;

use super::{Track, Vibe};

/// How many vibes the prompt asks for.
///
/// NOTE: this disagrees with `parse::EXPECTED_VIBE_COUNT` (3). Both are kept
/// as they are until someone decides which one is right.
pub const PROMPT_VIBE_COUNT: usize = 6;

pub const RESPONSE_EXAMPLE: &str = "Chill:45, Energetic:30, Melancholy:25";

/// One `- <title> by <artist>` line per track, in the order given.
pub fn track_summary(tracks: &[Track]) -> String {
    tracks
        .iter()
        .map(|t| format!("- {} by {}", t.title, t.primary_artist))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(track_summary: &str) -> String {
    let options = Vibe::iter()
        .enumerate()
        .map(|(i, vibe)| format!("{}. {}", i + 1, vibe))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze these songs and identify the top {count} dominant vibes with percentages:\n\
         {track_summary}\n\
         \n\
         VIBE OPTIONS (choose ONLY these exact names):\n\
         {options}\n\
         \n\
         RESPONSE FORMAT (must follow exactly):\n\
         {RESPONSE_EXAMPLE}\n\
         \n\
         Rules:\n\
         - Only use the provided vibe names\n\
         - Percentages must sum to 100\n\
         - Include exactly {count} vibes\n\
         - No additional text or explanation\n",
        count = PROMPT_VIBE_COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keeps_rank_order() {
        let tracks = vec![
            Track::new("Song A", "Artist X"),
            Track::new("Song B", "Artist Y"),
        ];
        assert_eq!(
            track_summary(&tracks),
            "- Song A by Artist X\n- Song B by Artist Y"
        );
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(track_summary(&[]), "");
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_prompt("- Song A by Artist X");
        assert!(prompt.starts_with("Analyze these songs and identify the top 6 dominant vibes"));
        assert!(prompt.contains("\n- Song A by Artist X\n"));
        assert!(prompt.contains("\n1. Chill\n"));
        assert!(prompt.contains("\n20. Alternative\n"));
        assert!(prompt.contains("Chill:45, Energetic:30, Melancholy:25"));
        assert!(prompt.contains("- Include exactly 6 vibes"));
        assert!(prompt.contains("- Percentages must sum to 100"));
    }
}
