use serde::{ser::SerializeMap, Serialize, Serializer};
use std::fmt;

pub mod classifier;
pub mod parse;
pub mod prompt;

/// The closed vocabulary the model is asked to choose from, in prompt order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum Vibe {
    Chill,
    Energetic,
    Melancholy,
    Romantic,
    Confident,
    Nostalgic,
    Artsy,
    Dark,
    Rage,
    Futuristic,
    Party,
    Ambient,
    Spiritual,
    Dreamy,
    Rebellious,
    Carefree,
    Classy,
    Cinematic,
    Theatrical,
    Alternative,
}

/// Aggregation window for "top tracks".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeRange {
    #[default]
    #[value(name = "short_term")]
    ShortTerm,
    #[value(name = "medium_term")]
    MediumTerm,
    #[value(name = "long_term")]
    LongTerm,
}

impl From<TimeRange> for rspotify::model::TimeRange {
    fn from(range: TimeRange) -> Self {
        match range {
            TimeRange::ShortTerm => rspotify::model::TimeRange::ShortTerm,
            TimeRange::MediumTerm => rspotify::model::TimeRange::MediumTerm,
            TimeRange::LongTerm => rspotify::model::TimeRange::LongTerm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub primary_artist: String,
    pub duration_ms: u32,
}

impl Track {
    pub fn new(title: impl Into<String>, primary_artist: impl Into<String>) -> Self {
        Track {
            title: title.into(),
            primary_artist: primary_artist.into(),
            duration_ms: 0,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// The part of a top artist that listening stats need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artist {
    pub genres: Vec<String>,
}

/// Vibe name to percentage weight, kept in insertion order.
///
/// Names are free text: whatever the model wrote is kept, even outside the
/// [`Vibe`] vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VibeResult {
    entries: Vec<(String, u32)>,
}

impl VibeResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `weight`. An existing name keeps its position and takes
    /// the new value.
    pub fn insert(&mut self, name: impl Into<String>, weight: u32) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((name, weight)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights, widened so a silly model answer can't overflow.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }

    /// `{Chill: 40, Energetic: 35, Romantic: 25}`, used when the model's
    /// answer doesn't validate.
    pub fn parse_fallback() -> Self {
        [(Vibe::Chill, 40), (Vibe::Energetic, 35), (Vibe::Romantic, 25)]
            .into_iter()
            .collect()
    }

    /// `{Chill: 0, Energetic: 0, Romantic: 0}`, used when the model call fails.
    pub fn error_fallback() -> Self {
        [(Vibe::Chill, 0), (Vibe::Energetic, 0), (Vibe::Romantic, 0)]
            .into_iter()
            .collect()
    }
}

impl FromIterator<(Vibe, u32)> for VibeResult {
    fn from_iter<I: IntoIterator<Item = (Vibe, u32)>>(iter: I) -> Self {
        let mut result = VibeResult::new();
        for (vibe, weight) in iter {
            result.insert(vibe.to_string(), weight);
        }
        result
    }
}

impl<'a> FromIterator<(&'a str, u32)> for VibeResult {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        let mut result = VibeResult::new();
        for (name, weight) in iter {
            result.insert(name, weight);
        }
        result
    }
}

impl fmt::Display for VibeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, weight)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} {weight}%")?;
        }
        Ok(())
    }
}

impl Serialize for VibeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, weight) in &self.entries {
            map.serialize_entry(name, weight)?;
        }
        map.end()
    }
}
