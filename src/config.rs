//! Configuration management for the Spotify batch downloader.
//!
//! Values come from environment variables and `.env` files. The lookup order
//! is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory
//! 4. Application defaults
//!
//! Missing credentials never abort the program: the Spotify adapter reports
//! every query as failed and the lyrics adapter turns itself off.

use std::{env, path::PathBuf, time::Duration};

pub const APP_DIR: &str = "spotify-downloader";

/// Placeholder shipped in `.env.example` for the Genius token.
pub const GENIUS_TOKEN_PLACEHOLDER: &str = "YOUR_TOKEN_HERE";

/// Loads environment variables from `.env` files.
///
/// The working directory file is read first, then the file located in the
/// platform-specific local data directory under `spotify-downloader/.env`.
/// Variables already present in the environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotify-downloader/.env`
/// - macOS: `~/Library/Application Support/spotify-downloader/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-downloader/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file there cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    // Absent working directory file is fine.
    let _ = dotenv::dotenv();

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the Spotify client ID, accepting the legacy `SPOTIPY_CLIENT_ID`.
pub fn spotify_client_id() -> Option<String> {
    non_empty_var("SPOTIFY_API_AUTH_CLIENT_ID").or_else(|| non_empty_var("SPOTIPY_CLIENT_ID"))
}

/// Returns the Spotify client secret, accepting the legacy `SPOTIPY_CLIENT_SECRET`.
///
/// The secret should be kept confidential and never exposed in logs.
pub fn spotify_client_secret() -> Option<String> {
    non_empty_var("SPOTIFY_API_AUTH_CLIENT_SECRET")
        .or_else(|| non_empty_var("SPOTIPY_CLIENT_SECRET"))
}

/// Returns the Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    non_empty_var("SPOTIFY_API_URL").unwrap_or_else(|| "https://api.spotify.com/v1".to_string())
}

pub fn spotify_apitoken_url() -> String {
    non_empty_var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Genius access token, `None` when unset or still the placeholder.
pub fn genius_access_token() -> Option<String> {
    non_empty_var("GENIUS_ACCESS_TOKEN").filter(|t| t != GENIUS_TOKEN_PLACEHOLDER)
}

pub fn genius_apiurl() -> String {
    non_empty_var("GENIUS_API_URL").unwrap_or_else(|| "https://api.genius.com".to_string())
}

pub fn ytdlp_path() -> String {
    non_empty_var("YTDLP_PATH").unwrap_or_else(|| "yt-dlp".to_string())
}

/// Explicit `ffmpeg` location. `None` lets `yt-dlp` find it on `PATH`.
pub fn ffmpeg_path() -> Option<String> {
    non_empty_var("FFMPEG_PATH")
}

pub fn audio_bitrate() -> String {
    non_empty_var("AUDIO_BITRATE").unwrap_or_else(|| "320k".to_string())
}

pub fn audio_format() -> String {
    non_empty_var("AUDIO_FORMAT").unwrap_or_else(|| "mp3".to_string())
}

pub fn http_timeout() -> Duration {
    let secs = non_empty_var("HTTP_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Every runtime setting, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub genius_token: Option<String>,
    pub genius_api_url: String,
    pub ytdlp_path: String,
    pub ffmpeg_path: Option<String>,
    pub audio_bitrate: String,
    pub audio_format: String,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            spotify_client_id: spotify_client_id(),
            spotify_client_secret: spotify_client_secret(),
            spotify_api_url: spotify_apiurl(),
            spotify_token_url: spotify_apitoken_url(),
            genius_token: genius_access_token(),
            genius_api_url: genius_apiurl(),
            ytdlp_path: ytdlp_path(),
            ffmpeg_path: ffmpeg_path(),
            audio_bitrate: audio_bitrate(),
            audio_format: audio_format(),
            http_timeout: http_timeout(),
        }
    }

    /// Shared HTTP client for the Spotify and Genius adapters.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
    }
}
