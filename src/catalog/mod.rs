//! # Catalog Module
//!
//! Resolves text queries to Spotify tracks and materializes resolved tracks
//! into local audio files.
//!
//! ```text
//! BatchDownloader
//!      ↓
//! Catalog (trait)
//!      ├── SpotifyClient   search, client credentials token
//!      └── AudioDownloader yt-dlp + ffmpeg child process
//! ```
//!
//! [`SpotifyCatalog`] composes both halves. The orchestrator only depends on
//! the [`Catalog`] trait so it can be driven by any other implementation.

mod auth;
mod download;
mod spotify;

use std::{fmt, path::PathBuf};

pub use auth::TokenManager;
pub use download::{AudioDownloader, audio_extension};
pub use spotify::SpotifyClient;

use crate::types::{Query, ResolvedTrack};

#[derive(Debug)]
pub enum CatalogError {
    /// Spotify client ID or secret not configured.
    MissingCredentials,
    Http(reqwest::Error),
    /// Unexpected response from the Spotify API.
    Api(String),
    /// The audio toolchain could not be started.
    Process(String),
    Io(std::io::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::MissingCredentials => write!(
                f,
                "Spotify credentials are missing (SPOTIFY_API_AUTH_CLIENT_ID / SPOTIFY_API_AUTH_CLIENT_SECRET)"
            ),
            CatalogError::Http(e) => write!(f, "request failed: {}", e),
            CatalogError::Api(msg) => write!(f, "Spotify API error: {}", msg),
            CatalogError::Process(msg) => write!(f, "audio download error: {}", msg),
            CatalogError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http(err)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

/// Search and download operations the orchestrator relies on.
pub trait Catalog {
    /// Maps a query to at most one best match.
    async fn resolve(&mut self, query: &Query) -> Result<Option<ResolvedTrack>, CatalogError>;

    /// Resolves several queries, keeping input order.
    async fn resolve_many(
        &mut self,
        queries: &[Query],
    ) -> Vec<Result<Option<ResolvedTrack>, CatalogError>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.resolve(query).await);
        }
        results
    }

    /// Produces a local audio file for `track`, `None` when nothing was written.
    async fn materialize(&mut self, track: &ResolvedTrack) -> Result<Option<PathBuf>, CatalogError>;
}

/// Spotify search backed by a `yt-dlp` download.
pub struct SpotifyCatalog {
    spotify: SpotifyClient,
    downloader: AudioDownloader,
}

impl SpotifyCatalog {
    pub fn new(spotify: SpotifyClient, downloader: AudioDownloader) -> Self {
        Self {
            spotify,
            downloader,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.spotify.has_credentials()
    }
}

impl Catalog for SpotifyCatalog {
    async fn resolve(&mut self, query: &Query) -> Result<Option<ResolvedTrack>, CatalogError> {
        self.spotify.search_track(&query.search_terms()).await
    }

    async fn materialize(&mut self, track: &ResolvedTrack) -> Result<Option<PathBuf>, CatalogError> {
        self.downloader.download(track).await
    }
}
