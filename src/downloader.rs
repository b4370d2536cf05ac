//! # Batch Orchestrator
//!
//! Drives every query of an input list through the catalog and lyrics
//! adapters, one query at a time:
//!
//! ```text
//! query ─→ resolve ─→ materialize ─→ lyrics (optional)
//!            │            │
//!            └─ failed    └─ failed
//! ```
//!
//! Every per-query error is converted into statistics and a log event at the
//! query boundary, so one broken query never stops the batch. Lyrics results
//! are reported but never change whether a query succeeded.

use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    catalog::Catalog,
    lyrics::{LyricsFetcher, LyricsSource},
    types::{
        DownloadOutcome, LyricsLayout, LyricsOutcome, LyricsState, Query, ResolvedTrack,
        SessionStats, Summary,
    },
    ui::{Event, Level, Presenter},
    utils,
};

pub const HEADER_TITLE: &str = "🎵 Spotify Downloader 🎵";

#[derive(Debug)]
pub enum InputError {
    FileNotFound(PathBuf),
    Io(PathBuf, std::io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::FileNotFound(path) => {
                write!(f, "File not found at path {}", path.display())
            }
            InputError::Io(path, e) => write!(f, "Cannot read {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub lyrics: bool,
    pub lyrics_layout: LyricsLayout,
}

pub struct BatchDownloader<C, L, P> {
    catalog: C,
    lyrics: LyricsFetcher<L>,
    lyrics_state: LyricsState,
    options: DownloadOptions,
    presenter: P,
    stats: SessionStats,
}

impl<C, L, P> BatchDownloader<C, L, P>
where
    C: Catalog,
    L: LyricsSource,
    P: Presenter,
{
    pub fn new(catalog: C, lyrics: LyricsFetcher<L>, presenter: P, options: DownloadOptions) -> Self {
        Self {
            catalog,
            lyrics,
            lyrics_state: LyricsState::from_flag(options.lyrics),
            options,
            presenter,
            stats: SessionStats::default(),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn lyrics_state(&self) -> LyricsState {
        self.lyrics_state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn summary(&self) -> Summary {
        self.stats.summary()
    }

    pub fn header(&mut self) {
        self.emit(Event::Header {
            title: HEADER_TITLE.to_string(),
        });
    }

    /// Emits the final summary panel.
    pub fn finish(&mut self) -> Summary {
        let summary = self.summary();
        self.emit(Event::Summary(summary.clone()));
        summary
    }

    /// Reads the non-blank lines of `path` as queries.
    pub async fn load_queries(&mut self, path: &Path) -> Result<Vec<Query>, InputError> {
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let err = InputError::FileNotFound(path.to_path_buf());
                self.log(Level::Error, format!("Error: {}", err));
                return Err(err);
            }
            Err(e) => {
                let err = InputError::Io(path.to_path_buf(), e);
                self.log(Level::Error, format!("Error: {}", err));
                return Err(err);
            }
        };

        let queries = utils::parse_queries(&content);
        if queries.is_empty() {
            self.log(Level::Warning, "Warning: the input file is empty.");
        }
        Ok(queries)
    }

    /// Loads `path` and runs every query in it.
    ///
    /// Input errors are reported through the presenter and leave the
    /// statistics untouched.
    pub async fn process_file(&mut self, path: &Path) -> &SessionStats {
        match self.load_queries(path).await {
            Ok(queries) if !queries.is_empty() => self.run(&queries).await,
            _ => &self.stats,
        }
    }

    /// Processes `queries` in order, one at a time.
    pub async fn run(&mut self, queries: &[Query]) -> &SessionStats {
        let total = queries.len();
        self.log(
            Level::Info,
            format!("Found {} queries. Processing them one by one...", total),
        );
        self.emit(Event::ProgressStart { total: total as u64 });

        for (i, query) in queries.iter().enumerate() {
            self.log(
                Level::Info,
                format!("({}/{}) Searching track for query '{}'", i + 1, total, query),
            );

            match self.process_query(query).await {
                (DownloadOutcome::Succeeded(path), Some(track)) => {
                    self.stats.record_success(track.duration_ms);
                    self.log(
                        Level::Success,
                        format!("Track '{}' downloaded to {}", track.name, path.display()),
                    );
                    self.fetch_lyrics(&track, &path).await;
                }
                _ => self.stats.record_failure(),
            }

            self.emit(Event::ProgressAdvance);
        }

        self.emit(Event::ProgressFinish);
        self.log(Level::Success, "All queries processed!");
        &self.stats
    }

    /// Resolves every query without downloading anything.
    pub async fn preview(&mut self, queries: &[Query]) -> Vec<(Query, Option<ResolvedTrack>)> {
        self.log(
            Level::Info,
            format!("Searching {} queries without downloading...", queries.len()),
        );

        let results = self.catalog.resolve_many(queries).await;
        let mut matches = Vec::with_capacity(queries.len());
        for (query, result) in queries.iter().zip(results) {
            let track = match result {
                Ok(track) => track,
                Err(e) => {
                    self.log(
                        Level::Error,
                        format!("Search failed for query '{}': {}", query, e),
                    );
                    None
                }
            };
            matches.push((query.clone(), track));
        }
        matches
    }

    async fn process_query(&mut self, query: &Query) -> (DownloadOutcome, Option<ResolvedTrack>) {
        let track = match self.catalog.resolve(query).await {
            Ok(Some(track)) => {
                self.log(
                    Level::Success,
                    format!(
                        "Track found on Spotify: '{} - {}'",
                        track.name,
                        track.display_artists()
                    ),
                );
                track
            }
            Ok(None) => {
                self.log(
                    Level::Warning,
                    format!("Track for query '{}' not found on Spotify.", query),
                );
                return (DownloadOutcome::NotFound, None);
            }
            Err(e) => {
                self.log(
                    Level::Error,
                    format!("Error while searching Spotify for query '{}': {}", query, e),
                );
                return (DownloadOutcome::NotFound, None);
            }
        };

        match self.catalog.materialize(&track).await {
            Ok(Some(path)) => (DownloadOutcome::Succeeded(path), Some(track)),
            Ok(None) => {
                self.log(
                    Level::Error,
                    format!(
                        "Failed to download track '{} - {}'",
                        track.name, track.artist
                    ),
                );
                (DownloadOutcome::DownloadFailed, Some(track))
            }
            Err(e) => {
                self.log(
                    Level::Error,
                    format!(
                        "Failed to download track '{} - {}': {}",
                        track.name, track.artist, e
                    ),
                );
                (DownloadOutcome::DownloadFailed, Some(track))
            }
        }
    }

    async fn fetch_lyrics(&mut self, track: &ResolvedTrack, audio_path: &Path) {
        if self.lyrics_state != LyricsState::Enabled {
            return;
        }

        if !self.lyrics.is_active() {
            self.log(
                Level::Warning,
                "Genius API token not found. Skipping lyrics for this run.",
            );
            self.lyrics_state = LyricsState::DisabledThisRun;
            return;
        }

        let lyrics_dir = self.lyrics_dir(audio_path);
        self.log(Level::Info, format!("Looking for lyrics of {}", track.name));

        match self.lyrics.fetch(&track.name, &track.artist, &lyrics_dir).await {
            Ok(LyricsOutcome::Found(_)) => self.log(
                Level::Success,
                format!("Lyrics for {} saved.", track.name),
            ),
            Ok(LyricsOutcome::Cached(_)) => self.log(
                Level::Success,
                format!("Lyrics for {} already present.", track.name),
            ),
            Ok(LyricsOutcome::NotFound) => self.log(
                Level::Warning,
                format!("Lyrics for {} not found.", track.name),
            ),
            Err(e) => self.log(
                Level::Warning,
                format!("Lyrics for {} not found: {}", track.name, e),
            ),
        }
    }

    fn lyrics_dir(&self, audio_path: &Path) -> PathBuf {
        match self.options.lyrics_layout {
            LyricsLayout::Subfolder => self.options.output_dir.join("lyrics"),
            LyricsLayout::Alongside => audio_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.options.output_dir.clone()),
        }
    }

    fn log(&mut self, level: Level, message: impl Into<String>) {
        self.emit(Event::Log {
            level,
            message: message.into(),
        });
    }

    fn emit(&mut self, event: Event) {
        self.presenter.handle(event);
    }
}
