use serde::Serialize;
use tracing::{debug, info, warn};

use super::{parse, prompt, TimeRange, Track, VibeResult};
use crate::oracle::TextOracle;
use crate::spotify::{SourceError, TrackSource};

pub const TOP_TRACK_LIMIT: u32 = 50;

/// Where a [`VibeResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VibeSource {
    /// The model's answer passed validation.
    Oracle,
    /// The model answered but the answer didn't validate.
    ParseFallback,
    /// The model call itself failed.
    ErrorFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub source: VibeSource,
    pub vibes: VibeResult,
}

pub struct VibeClassifier<S, O> {
    source: S,
    oracle: O,
}

impl<S: TrackSource, O: TextOracle> VibeClassifier<S, O> {
    pub fn new(source: S, oracle: O) -> Self {
        VibeClassifier { source, oracle }
    }

    /// Classifies the user's top tracks for `time_range`.
    ///
    /// Track source failures are returned as errors. Anything that goes wrong
    /// from the model call onwards is logged and replaced by a fallback.
    pub async fn classify_vibes(&self, time_range: TimeRange) -> Result<VibeResult, SourceError> {
        Ok(self.classify(time_range).await?.vibes)
    }

    /// Same as [`Self::classify_vibes`], but also reports which path produced
    /// the result.
    pub async fn classify(&self, time_range: TimeRange) -> Result<Classification, SourceError> {
        let tracks = self.source.top_tracks(time_range, TOP_TRACK_LIMIT).await?;
        Ok(self.classify_tracks(time_range, &tracks).await)
    }

    /// Runs the model stage over tracks that were already fetched. Never
    /// fails: model and format errors become fallbacks.
    pub async fn classify_tracks(&self, time_range: TimeRange, tracks: &[Track]) -> Classification {
        info!(%time_range, tracks = tracks.len(), "Classifying top tracks");

        let summary = prompt::track_summary(tracks);
        let prompt = prompt::build_prompt(&summary);

        debug!(model = self.oracle.model(), "Asking the model");
        let raw = match self.oracle.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Error analyzing vibes: {e}");
                return Classification {
                    source: VibeSource::ErrorFallback,
                    vibes: VibeResult::error_fallback(),
                };
            }
        };
        info!("Model raw response: {}", raw.trim());

        match parse::parse_response(&raw) {
            Ok(vibes) => Classification {
                source: VibeSource::Oracle,
                vibes,
            },
            Err(e) => {
                warn!("Invalid format from model ({e}), using fallback");
                Classification {
                    source: VibeSource::ParseFallback,
                    vibes: VibeResult::parse_fallback(),
                }
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
