use thiserror::Error;

use super::VibeResult;

/// Entry count a model answer needs to be accepted.
///
/// NOTE: the prompt asks for `prompt::PROMPT_VIBE_COUNT` (6). Kept at 3 on
/// purpose until the intended count is settled.
pub const EXPECTED_VIBE_COUNT: usize = 3;

pub const EXPECTED_TOTAL: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no vibe:percent pairs in the answer")]
    NoPairs,
    #[error("expected {expected} vibes, found {found}")]
    WrongCount { expected: usize, found: usize },
    #[error("percentages sum to {total}, expected 100")]
    WrongTotal { total: u64 },
}

/// Pulls `name:percent` pairs out of free text.
///
/// Segments are comma separated. A segment counts only if it has exactly one
/// `:` and the trimmed value is all ASCII digits. Later duplicates overwrite
/// earlier ones.
pub fn parse_pairs(text: &str) -> VibeResult {
    let mut vibes = VibeResult::new();
    for segment in text.trim().split(',') {
        let mut parts = segment.split(':');
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        // all digits, so the only failure left is overflow
        let weight = value.parse::<u32>().unwrap_or(u32::MAX);
        vibes.insert(name.trim(), weight);
    }
    vibes
}

pub fn validate(vibes: VibeResult) -> Result<VibeResult, ParseError> {
    if vibes.is_empty() {
        return Err(ParseError::NoPairs);
    }
    if vibes.len() != EXPECTED_VIBE_COUNT {
        return Err(ParseError::WrongCount {
            expected: EXPECTED_VIBE_COUNT,
            found: vibes.len(),
        });
    }
    let total = vibes.total();
    if total != EXPECTED_TOTAL {
        return Err(ParseError::WrongTotal { total });
    }
    Ok(vibes)
}

pub fn parse_response(text: &str) -> Result<VibeResult, ParseError> {
    validate(parse_pairs(text))
}
