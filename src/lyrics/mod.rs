//! Lyrics lookup and storage.
//!
//! [`LyricsFetcher`] owns the file side: the deterministic file name, the
//! cache check, cleanup of the raw text and the atomic write. The remote side
//! is a [`LyricsSource`], implemented for Genius by [`GeniusClient`].

mod genius;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

pub use genius::{GeniusClient, decode_entities, extract_lyrics};

use crate::{types::LyricsOutcome, utils};

static CONTRIBUTORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d*Contributors.*").expect("valid contributors regex"));

#[derive(Debug)]
pub enum LyricsError {
    Http(reqwest::Error),
    Io(std::io::Error),
}

impl fmt::Display for LyricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyricsError::Http(e) => write!(f, "lyrics request failed: {}", e),
            LyricsError::Io(e) => write!(f, "cannot write lyrics: {}", e),
        }
    }
}

impl std::error::Error for LyricsError {}

impl From<reqwest::Error> for LyricsError {
    fn from(err: reqwest::Error) -> Self {
        LyricsError::Http(err)
    }
}

impl From<std::io::Error> for LyricsError {
    fn from(err: std::io::Error) -> Self {
        LyricsError::Io(err)
    }
}

/// A remote service able to return raw lyrics text.
pub trait LyricsSource {
    /// `false` when required credentials are missing.
    fn is_active(&self) -> bool;

    async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<Option<String>, LyricsError>;
}

/// File name used for the lyrics of a track inside `output_dir`.
pub fn lyrics_path(output_dir: &Path, track_name: &str, artist_name: &str) -> PathBuf {
    output_dir.join(utils::clean_filename(&format!(
        "{} - {}.lrc",
        artist_name, track_name
    )))
}

/// Strips the page furniture Genius wraps around lyrics.
pub fn clean_lyrics(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    if lines.last().is_some_and(|l| l.contains("Embed")) {
        lines.pop();
    }
    if lines.first().is_some_and(|l| l.contains("Embed")) {
        lines.remove(0);
    }

    let text = lines.join("\n");
    CONTRIBUTORS.replace_all(text.trim(), "").trim().to_string()
}

pub struct LyricsFetcher<S> {
    source: S,
}

impl<S: LyricsSource> LyricsFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    /// Finds and stores the lyrics of a track.
    ///
    /// An existing file at [`lyrics_path`] is a cache hit and no request is
    /// made. Otherwise the text is written through a temporary file so a
    /// failure never leaves a partial artifact behind.
    pub async fn fetch(
        &self,
        track_name: &str,
        artist_name: &str,
        output_dir: &Path,
    ) -> Result<LyricsOutcome, LyricsError> {
        let path = lyrics_path(output_dir, track_name, artist_name);
        if path.is_file() {
            return Ok(LyricsOutcome::Cached(path));
        }

        if !self.is_active() {
            return Ok(LyricsOutcome::NotFound);
        }

        let Some(raw) = self.source.search(track_name, artist_name).await? else {
            return Ok(LyricsOutcome::NotFound);
        };

        let text = clean_lyrics(&raw);
        if text.is_empty() {
            return Ok(LyricsOutcome::NotFound);
        }

        async_fs::create_dir_all(output_dir).await?;
        let tmp = path.with_extension("lrc.part");
        if let Err(e) = write_then_rename(&tmp, &path, &text).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(LyricsOutcome::Found(path))
    }
}

async fn write_then_rename(tmp: &Path, path: &Path, text: &str) -> std::io::Result<()> {
    async_fs::write(tmp, text).await?;
    async_fs::rename(tmp, path).await
}
