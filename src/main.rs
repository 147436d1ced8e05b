mod config;
mod oracle;
mod report;
mod spotify;
mod stats;
mod vibes;

use anyhow::{Context, Result};
use clap::Parser;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    oracle::gemini::GeminiOracle,
    report::{render_window, OutputFormat},
    spotify::{authorize, top_tracks::TopTracks},
    vibes::{classifier::VibeClassifier, TimeRange},
};

#[derive(Parser)]
#[command(name = "topvibes", version, about = "Classify your Spotify top tracks into vibes")]
struct Cli {
    /// Time window to classify (repeatable). Defaults to all three.
    #[arg(short, long = "time-range", value_enum)]
    time_range: Vec<TimeRange>,

    /// Print one JSON object per time window
    #[arg(long)]
    json: bool,

    /// Also print estimated minutes played and top genres
    #[arg(long)]
    stats: bool,

    /// Gemini model to ask (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Requested windows in the order given, or all three.
    fn ranges(&self) -> Vec<TimeRange> {
        if self.time_range.is_empty() {
            TimeRange::iter().collect()
        } else {
            self.time_range.clone()
        }
    }

    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }

    fn apply_to(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.gemini_model = model.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────────
    let default_level = match cli.verbose {
        0 => "topvibes=info",
        1 => "topvibes=debug",
        _ => "topvibes=trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries results only
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load().context("Configuration error")?;
    cli.apply_to(&mut config);

    // ── Spotify auth ─────────────────────────────────────────────────────────
    let spotify = authorize(&config).await?;
    info!("Authenticated successfully");

    let oracle = GeminiOracle::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.gemini_api_key,
    );
    let classifier = VibeClassifier::new(TopTracks::new(spotify), oracle);

    // ── Classify each window ─────────────────────────────────────────────────
    for range in cli.ranges() {
        let output = render_window(&classifier, range, cli.format(), cli.stats)
            .await
            .with_context(|| format!("Failed to classify {range}"))?;
        println!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("topvibes").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_to_all_ranges_in_order() {
        let cli = parse(&[]);
        assert_eq!(
            cli.ranges(),
            vec![TimeRange::ShortTerm, TimeRange::MediumTerm, TimeRange::LongTerm]
        );
        assert_eq!(cli.format(), OutputFormat::Plain);
        assert!(!cli.stats);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_repeated_time_range_keeps_given_order() {
        let cli = parse(&["-t", "long_term", "--time-range", "short_term"]);
        assert_eq!(cli.ranges(), vec![TimeRange::LongTerm, TimeRange::ShortTerm]);
    }

    #[test]
    fn test_unknown_time_range_is_rejected() {
        assert!(Cli::try_parse_from(["topvibes", "-t", "yearly"]).is_err());
    }

    #[test]
    fn test_json_stats_and_verbosity_flags() {
        let cli = parse(&["--json", "--stats", "-vv"]);
        assert_eq!(cli.format(), OutputFormat::Json);
        assert!(cli.stats);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_model_flag_overrides_config() {
        let mut config = Config::from_lookup(|key| match key {
            "SPOTIFY_CLIENT_ID" | "SPOTIFY_CLIENT_SECRET" | "GEMINI_API_KEY" => {
                Some("x".to_string())
            }
            "SPOTIFY_REDIRECT_URI" => Some("http://127.0.0.1:8989/callback".to_string()),
            _ => None,
        })
        .unwrap();

        parse(&[]).apply_to(&mut config);
        assert_eq!(config.gemini_model, crate::config::DEFAULT_GEMINI_MODEL);

        parse(&["--model", "gemini-2.0-flash"]).apply_to(&mut config);
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }
}
