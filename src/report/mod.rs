//! Per-window output lines for the CLI.

use anyhow::Result;
use serde::Serialize;

use crate::oracle::TextOracle;
use crate::spotify::{SourceError, TrackSource};
use crate::stats::{ListeningStats, TOP_ARTIST_LIMIT};
use crate::vibes::{
    classifier::{VibeClassifier, VibeSource, TOP_TRACK_LIMIT},
    TimeRange, VibeResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Everything printed for one time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub time_range: TimeRange,
    pub source: VibeSource,
    pub vibes: VibeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ListeningStats>,
}

impl Report {
    /// One JSON object. Vibes keep the order the model gave them.
    pub fn json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn plain(&self) -> String {
        let line = plain_line(self.time_range, &self.vibes);
        match &self.stats {
            Some(stats) => format!("{line}\n  {stats}"),
            None => line,
        }
    }
}

/// `short_term: Chill 45%, Energetic 30%, Melancholy 25%`
pub fn plain_line(time_range: TimeRange, vibes: &VibeResult) -> String {
    format!("{time_range}: {vibes}")
}

/// Classifies one window and, with `with_stats`, adds listening stats
/// computed from the same top-track fetch. Source errors are returned before
/// the model is asked anything.
pub async fn build_report<S: TrackSource, O: TextOracle>(
    classifier: &VibeClassifier<S, O>,
    time_range: TimeRange,
    with_stats: bool,
) -> Result<Report, SourceError> {
    if !with_stats {
        let classification = classifier.classify(time_range).await?;
        return Ok(Report {
            time_range,
            source: classification.source,
            vibes: classification.vibes,
            stats: None,
        });
    }

    let source = classifier.source();
    let tracks = source.top_tracks(time_range, TOP_TRACK_LIMIT).await?;
    let artists = source.top_artists(time_range, TOP_ARTIST_LIMIT).await?;
    let stats = ListeningStats::from_top(&tracks, &artists);

    let classification = classifier.classify_tracks(time_range, &tracks).await;
    Ok(Report {
        time_range,
        source: classification.source,
        vibes: classification.vibes,
        stats: Some(stats),
    })
}

/// The text printed for one window.
pub async fn render_window<S: TrackSource, O: TextOracle>(
    classifier: &VibeClassifier<S, O>,
    time_range: TimeRange,
    format: OutputFormat,
    with_stats: bool,
) -> Result<String> {
    if format == OutputFormat::Plain && !with_stats {
        let vibes = classifier.classify_vibes(time_range).await?;
        return Ok(plain_line(time_range, &vibes));
    }

    let report = build_report(classifier, time_range, with_stats).await?;
    Ok(match format {
        OutputFormat::Json => report.json_line()?,
        OutputFormat::Plain => report.plain(),
    })
}
