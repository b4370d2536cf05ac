use std::{fmt, path::PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tabled::Tabled;

use crate::utils;

/// Separator between artist and track in a structured query line.
pub const QUERY_SEPARATOR: &str = " - ";

/// One line of user input representing a desired track.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Builds a query from a raw input line, `None` for blank lines.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits `"<artist> - <track>"` at the last separator.
    ///
    /// Falls back to free text when there is no separator or one of the two
    /// sides is empty.
    pub fn search_terms(&self) -> SearchTerms {
        match self.0.rsplit_once(QUERY_SEPARATOR) {
            Some((artist, track)) if !artist.trim().is_empty() && !track.trim().is_empty() => {
                SearchTerms::Structured {
                    artist: artist.trim().to_string(),
                    track: track.trim().to_string(),
                }
            }
            _ => SearchTerms::FreeText(self.0.clone()),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerms {
    Structured { artist: String, track: String },
    FreeText(String),
}

impl SearchTerms {
    /// Renders the terms in the catalog's field filter syntax.
    pub fn to_catalog_query(&self) -> String {
        match self {
            SearchTerms::Structured { artist, track } => {
                format!("artist:{artist} track:{track}")
            }
            SearchTerms::FreeText(text) => text.clone(),
        }
    }
}

/// A catalog track matched for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub id: String,
    pub name: String,
    /// First credited artist, used for file names.
    pub artist: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_ms: u64,
    pub url: String,
}

impl ResolvedTrack {
    pub fn display_artists(&self) -> String {
        if self.artists.is_empty() {
            return self.artist.clone();
        }
        self.artists.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Succeeded(PathBuf),
    NotFound,
    DownloadFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsOutcome {
    /// Fetched remotely and written to the given path.
    Found(PathBuf),
    /// A lyrics file already existed, no remote call was made.
    Cached(PathBuf),
    NotFound,
}

impl LyricsOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LyricsOutcome::Found(_) | LyricsOutcome::Cached(_))
    }
}

/// Lyrics retrieval state of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsState {
    Enabled,
    /// Turned off by the user.
    Disabled,
    /// The lyrics source reported itself inactive during this run.
    DisabledThisRun,
}

impl LyricsState {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            LyricsState::Enabled
        } else {
            LyricsState::Disabled
        }
    }
}

/// Where lyrics files are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LyricsLayout {
    /// A dedicated `lyrics/` folder inside the output directory.
    #[default]
    Subfolder,
    /// Next to the downloaded audio file.
    Alongside,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub succeeded: u32,
    pub failed: u32,
    pub total_duration_ms: u64,
}

impl SessionStats {
    pub fn record_success(&mut self, duration_ms: u64) {
        self.succeeded += 1;
        self.total_duration_ms += duration_ms;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn processed(&self) -> u32 {
        self.succeeded + self.failed
    }

    pub fn summary(&self) -> Summary {
        Summary {
            succeeded: self.succeeded,
            failed: self.failed,
            total_duration: utils::format_duration(self.total_duration_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: u32,
    pub failed: u32,
    /// `H:MM:SS`
    pub total_duration: String,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub outcome: String,
    pub value: String,
}

#[derive(Tabled)]
pub struct PreviewTableRow {
    pub query: String,
    pub track: String,
    pub artists: String,
    pub duration: String,
}

// Spotify Web API payloads

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

impl From<Track> for ResolvedTrack {
    fn from(track: Track) -> Self {
        let artists: Vec<String> = track.artists.into_iter().map(|a| a.name).collect();
        let url = track
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", track.id));

        ResolvedTrack {
            artist: artists
                .first()
                .cloned()
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            artists,
            album: track.album.map(|a| a.name),
            duration_ms: track.duration_ms,
            name: track.name,
            id: track.id,
            url,
        }
    }
}

// Genius API payloads

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearchResponse {
    pub response: GeniusSearchBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearchBody {
    pub hits: Vec<GeniusHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHit {
    #[serde(rename = "type")]
    pub kind: String,
    pub result: GeniusSong,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSong {
    pub title: String,
    pub url: String,
    pub primary_artist: Option<GeniusArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusArtist {
    pub name: String,
}
