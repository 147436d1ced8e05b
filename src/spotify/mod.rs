use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rspotify::{
    clients::OAuthClient, scopes, AuthCodeSpotify, Config as SpotifyConfig, Credentials, OAuth,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::vibes::{Artist, TimeRange, Track};
use self::auth::{callback_addr, wait_for_auth_code};

pub mod auth;
pub mod top_tracks;

/// Upstream failures from the track source. These are never swallowed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Spotify authorization failed: {0}")]
    Auth(String),
    #[error("Spotify request failed: {0}")]
    Request(String),
}

impl From<rspotify::ClientError> for SourceError {
    fn from(err: rspotify::ClientError) -> Self {
        SourceError::Request(err.to_string())
    }
}

/// Ranked listening history for a time window.
#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn top_tracks(&self, time_range: TimeRange, limit: u32)
        -> Result<Vec<Track>, SourceError>;

    async fn top_artists(&self, time_range: TimeRange, limit: u32)
        -> Result<Vec<Artist>, SourceError>;
}

pub fn build_spotify_client(config: &Config) -> Result<(Arc<Mutex<AuthCodeSpotify>>, String)> {
    let creds = Credentials::new(&config.client_id, &config.client_secret);

    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes: scopes!("user-top-read"),
        ..Default::default()
    };

    let sp_config = SpotifyConfig {
        token_refreshing: true,
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(creds, oauth, sp_config);
    let url = spotify.get_authorize_url(false)?;

    Ok((Arc::new(Mutex::new(spotify)), url))
}

pub async fn complete_auth(spotify: &Arc<Mutex<AuthCodeSpotify>>, code: &str) -> Result<()> {
    let sp = spotify.lock().await;
    sp.request_token(code)
        .await
        .context("Failed to exchange authorization code for a token")?;
    info!("Spotify token acquired");
    Ok(())
}

/// Runs the whole authorization-code flow: open the browser, wait for the
/// redirect on the configured URI, check `state`, swap the code for a token.
pub async fn authorize(config: &Config) -> Result<Arc<Mutex<AuthCodeSpotify>>> {
    let (spotify, url) = build_spotify_client(config)?;
    let addr = callback_addr(&config.redirect_uri)?;

    eprintln!("Log in to Spotify to continue:\n  {url}");
    if let Err(e) = open::that(&url) {
        warn!("Could not open browser: {e}");
    }

    let auth_result = wait_for_auth_code(&addr).await?;
    let expected_state = spotify.lock().await.oauth.state.clone();
    if auth_result.state != expected_state {
        bail!("OAuth state mismatch in Spotify redirect");
    }

    complete_auth(&spotify, &auth_result.code).await?;
    Ok(spotify)
}
