use async_trait::async_trait;
use rspotify::{
    model::{FullArtist, FullTrack},
    prelude::*,
    AuthCodeSpotify,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::{SourceError, TrackSource};
use crate::vibes::{Artist, TimeRange, Track};

const UNKNOWN_ARTIST: &str = "Unknown Artist";

pub struct TopTracks {
    spotify: Arc<Mutex<AuthCodeSpotify>>,
}

impl TopTracks {
    pub fn new(spotify: Arc<Mutex<AuthCodeSpotify>>) -> Self {
        TopTracks { spotify }
    }
}

async fn ensure_token(sp: &AuthCodeSpotify) -> Result<(), SourceError> {
    let has_token = match sp.token.lock().await {
        Ok(token) => token.is_some(),
        Err(_) => false,
    };
    if has_token {
        Ok(())
    } else {
        Err(SourceError::Auth("no access token, log in first".to_string()))
    }
}

#[async_trait]
impl TrackSource for TopTracks {
    async fn top_tracks(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SourceError> {
        let sp = self.spotify.lock().await;
        ensure_token(&sp).await?;

        let page = sp
            .current_user_top_tracks_manual(Some(time_range.into()), Some(limit), Some(0))
            .await?;

        debug!(%time_range, count = page.items.len(), "Fetched top tracks");
        Ok(page.items.iter().map(to_track).collect())
    }

    async fn top_artists(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SourceError> {
        let sp = self.spotify.lock().await;
        ensure_token(&sp).await?;

        let page = sp
            .current_user_top_artists_manual(Some(time_range.into()), Some(limit), Some(0))
            .await?;

        debug!(%time_range, count = page.items.len(), "Fetched top artists");
        Ok(page.items.into_iter().map(to_artist).collect())
    }
}

fn to_track(track: &FullTrack) -> Track {
    let artist = track
        .artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let duration_ms = track.duration.num_milliseconds().clamp(0, u32::MAX as i64) as u32;
    Track::new(track.name.clone(), artist).with_duration_ms(duration_ms)
}

fn to_artist(artist: FullArtist) -> Artist {
    Artist {
        genres: artist.genres,
    }
}
