//! Listening stats derived from the same top lists the classifier uses.

use serde::Serialize;
use std::fmt;

use crate::vibes::{Artist, Track};

pub const TOP_ARTIST_LIMIT: u32 = 50;
pub const TOP_GENRE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListeningStats {
    pub estimated_minutes_played: u64,
    pub top_genres: Vec<GenreCount>,
}

impl ListeningStats {
    pub fn from_top(tracks: &[Track], artists: &[Artist]) -> Self {
        ListeningStats {
            estimated_minutes_played: minutes_played(tracks),
            top_genres: top_genres(artists, TOP_GENRE_COUNT),
        }
    }
}

impl fmt::Display for ListeningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{} min", self.estimated_minutes_played)?;
        if self.top_genres.is_empty() {
            return Ok(());
        }
        write!(f, ", top genres: ")?;
        for (i, g) in self.top_genres.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ({})", g.genre, g.count)?;
        }
        Ok(())
    }
}

/// Whole minutes across one play of each track, rounded down.
pub fn minutes_played(tracks: &[Track]) -> u64 {
    let total_ms: u64 = tracks.iter().map(|t| u64::from(t.duration_ms)).sum();
    total_ms / 60_000
}

/// Genres counted over all artists, most frequent first. Ties keep the order
/// in which the genre first showed up.
pub fn top_genres(artists: &[Artist], limit: usize) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        match counts.iter_mut().find(|c| c.genre == *genre) {
            Some(c) => c.count += 1,
            None => counts.push(GenreCount {
                genre: genre.clone(),
                count: 1,
            }),
        }
    }
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(genres: &[&str]) -> Artist {
        Artist {
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_minutes_round_down() {
        let tracks = vec![
            Track::new("A", "X").with_duration_ms(200_000),
            Track::new("B", "Y").with_duration_ms(219_999),
        ];
        // 419_999 ms is just under 7 minutes
        assert_eq!(minutes_played(&tracks), 6);
        assert_eq!(minutes_played(&[]), 0);
    }

    #[test]
    fn test_top_genres_by_frequency() {
        let artists = vec![
            artist(&["indie pop", "bedroom pop"]),
            artist(&["indie pop", "shoegaze"]),
            artist(&["shoegaze", "indie pop"]),
            artist(&[]),
        ];
        let top = top_genres(&artists, 5);
        let flat: Vec<_> = top.iter().map(|g| (g.genre.as_str(), g.count)).collect();
        assert_eq!(
            flat,
            vec![("indie pop", 3), ("shoegaze", 2), ("bedroom pop", 1)]
        );
    }

    #[test]
    fn test_top_genres_truncates_and_keeps_first_seen_on_ties() {
        let artists = vec![artist(&["a", "b", "c", "d", "e", "f", "g"])];
        let top = top_genres(&artists, TOP_GENRE_COUNT);
        let names: Vec<_> = top.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_display() {
        let stats = ListeningStats {
            estimated_minutes_played: 184,
            top_genres: vec![
                GenreCount { genre: "rap".to_string(), count: 4 },
                GenreCount { genre: "trap".to_string(), count: 2 },
            ],
        };
        assert_eq!(stats.to_string(), "~184 min, top genres: rap (4), trap (2)");

        let bare = ListeningStats::from_top(&[], &[]);
        assert_eq!(bare.to_string(), "~0 min");
    }
}
