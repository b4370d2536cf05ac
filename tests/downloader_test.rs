use std::{
    cell::Cell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use spotify_downloader::{
    catalog::{Catalog, CatalogError},
    downloader::{BatchDownloader, DownloadOptions},
    lyrics::{LyricsError, LyricsFetcher, LyricsSource},
    types::{LyricsLayout, LyricsState, Query, ResolvedTrack},
    ui::{Event, Level, RecordingPresenter},
    utils,
};
use tempfile::TempDir;

// Catalog that knows a fixed set of queries and writes dummy audio files.
struct FakeCatalog {
    output_dir: PathBuf,
    known: HashMap<String, ResolvedTrack>,
    broken_downloads: HashSet<String>,
    erroring_queries: HashSet<String>,
    searched: Vec<String>,
    materialized: usize,
}

impl FakeCatalog {
    fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            known: HashMap::new(),
            broken_downloads: HashSet::new(),
            erroring_queries: HashSet::new(),
            searched: Vec::new(),
            materialized: 0,
        }
    }

    fn with_track(mut self, query: &str, name: &str, artist: &str, duration_ms: u64) -> Self {
        self.known.insert(
            query.to_string(),
            ResolvedTrack {
                id: format!("{}_id", name),
                name: name.to_string(),
                artist: artist.to_string(),
                artists: vec![artist.to_string()],
                album: None,
                duration_ms,
                url: format!("https://open.spotify.com/track/{}_id", name),
            },
        );
        self
    }
}

impl Catalog for FakeCatalog {
    async fn resolve(&mut self, query: &Query) -> Result<Option<ResolvedTrack>, CatalogError> {
        self.searched.push(query.search_terms().to_catalog_query());
        if self.erroring_queries.contains(query.as_str()) {
            return Err(CatalogError::Api("connection reset".to_string()));
        }
        Ok(self.known.get(query.as_str()).cloned())
    }

    async fn materialize(&mut self, track: &ResolvedTrack) -> Result<Option<PathBuf>, CatalogError> {
        if self.broken_downloads.contains(&track.name) {
            return Ok(None);
        }
        let path = self
            .output_dir
            .join(format!("{} - {}.mp3", track.artist, track.name));
        std::fs::write(&path, b"audio")?;
        self.materialized += 1;
        Ok(Some(path))
    }
}

// Lyrics source with a switchable token and a call counter.
struct FakeLyrics {
    active: bool,
    lyrics: Option<String>,
    calls: Cell<usize>,
}

impl FakeLyrics {
    fn active(lyrics: Option<&str>) -> Self {
        Self {
            active: true,
            lyrics: lyrics.map(str::to_string),
            calls: Cell::new(0),
        }
    }

    fn inactive() -> Self {
        Self {
            active: false,
            lyrics: None,
            calls: Cell::new(0),
        }
    }
}

impl LyricsSource for FakeLyrics {
    fn is_active(&self) -> bool {
        self.active
    }

    async fn search(
        &self,
        _track_name: &str,
        _artist_name: &str,
    ) -> Result<Option<String>, LyricsError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.lyrics.clone())
    }
}

type TestDownloader = BatchDownloader<FakeCatalog, FakeLyrics, RecordingPresenter>;

fn create_downloader(
    dir: &TempDir,
    catalog: FakeCatalog,
    lyrics: FakeLyrics,
    lyrics_enabled: bool,
    layout: LyricsLayout,
) -> TestDownloader {
    BatchDownloader::new(
        catalog,
        LyricsFetcher::new(lyrics),
        RecordingPresenter::new(),
        DownloadOptions {
            output_dir: dir.path().to_path_buf(),
            lyrics: lyrics_enabled,
            lyrics_layout: layout,
        },
    )
}

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("songs.txt");
    std::fs::write(&path, content).unwrap();
    path
}

fn mentions_lyrics(line: &str) -> bool {
    let line = line.to_lowercase();
    line.contains("lyrics") || line.contains("genius")
}

#[tokio::test]
async fn test_mixed_input_counts_one_success_one_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "Daft Punk - One More Time\n\n   \nNoSuchSongXYZ123\n");
    let catalog = FakeCatalog::new(dir.path()).with_track(
        "Daft Punk - One More Time",
        "One More Time",
        "Daft Punk",
        320_357,
    );

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), false, LyricsLayout::Subfolder);
    let stats = downloader.process_file(&input).await.clone();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.processed(), 2);

    let summary = downloader.finish();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_duration, "0:05:20");

    // Structured search for the separator query, free text for the other
    assert_eq!(
        downloader.catalog().searched,
        vec![
            "artist:Daft Punk track:One More Time".to_string(),
            "NoSuchSongXYZ123".to_string()
        ]
    );

    // One progress tick per query
    assert_eq!(downloader.presenter().advances(), 2);
    assert!(matches!(
        downloader.presenter().events.last(),
        Some(Event::Summary(_))
    ));
}

#[tokio::test]
async fn test_missing_input_file_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = FakeCatalog::new(dir.path());
    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), true, LyricsLayout::Subfolder);

    let stats = downloader
        .process_file(&dir.path().join("missing.txt"))
        .await
        .clone();

    assert_eq!(stats.processed(), 0);
    assert_eq!(downloader.summary().succeeded, 0);
    assert_eq!(downloader.summary().failed, 0);
    assert!(downloader.catalog().searched.is_empty());
    assert!(
        downloader
            .presenter()
            .log_lines()
            .iter()
            .any(|l| l.contains("File not found"))
    );
    assert_eq!(downloader.presenter().count_level(Level::Error), 1);
}

#[tokio::test]
async fn test_blank_input_file_warns_and_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "\n   \n\t\n");
    let catalog = FakeCatalog::new(dir.path());
    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), true, LyricsLayout::Subfolder);

    let queries = downloader.load_queries(&input).await.unwrap();
    assert!(queries.is_empty());

    let stats = downloader.process_file(&input).await.clone();
    assert_eq!(stats.processed(), 0);
    assert!(downloader.presenter().count_level(Level::Warning) >= 1);
    assert!(
        !downloader
            .presenter()
            .events
            .iter()
            .any(|e| matches!(e, Event::ProgressStart { .. }))
    );
}

#[tokio::test]
async fn test_failures_never_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        "A - Broken\nB - Error\nC - Fine\nUnknown\nC - Fine\n",
    );
    let mut catalog = FakeCatalog::new(dir.path())
        .with_track("A - Broken", "Broken", "A", 1_000)
        .with_track("B - Error", "Error", "B", 2_000)
        .with_track("C - Fine", "Fine", "C", 3_000);
    catalog.broken_downloads.insert("Broken".to_string());
    catalog.erroring_queries.insert("B - Error".to_string());

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), false, LyricsLayout::Subfolder);
    let stats = downloader.process_file(&input).await.clone();

    // Duplicated line is processed twice
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.processed(), 5);
    assert_eq!(stats.total_duration_ms, 6_000);
    assert_eq!(downloader.catalog().searched.len(), 5);
    assert_eq!(downloader.catalog().materialized, 2);
    assert_eq!(downloader.presenter().advances(), 5);
}

#[tokio::test]
async fn test_processed_count_matches_non_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let content = "One\n\nTwo\n  \nThree - 3\nFour\n\n";
    let input = write_input(&dir, content);
    let catalog = FakeCatalog::new(dir.path()).with_track("Three - 3", "3", "Three", 180_000);

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), false, LyricsLayout::Subfolder);
    let stats = downloader.process_file(&input).await.clone();

    assert_eq!(
        stats.processed() as usize,
        utils::parse_queries(content).len()
    );
    assert_eq!(stats.succeeded, 1);
    assert_eq!(downloader.summary().total_duration, "0:03:00");
}

#[tokio::test]
async fn test_total_duration_sums_successful_tracks_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = FakeCatalog::new(dir.path())
        .with_track("A - 1", "1", "A", 1_800_000)
        .with_track("B - 2", "2", "B", 1_805_000)
        .with_track("C - 3", "3", "C", 999_000);
    catalog.broken_downloads.insert("3".to_string());

    let queries: Vec<Query> = ["A - 1", "B - 2", "C - 3"]
        .iter()
        .filter_map(|q| Query::new(q))
        .collect();

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), false, LyricsLayout::Subfolder);
    downloader.run(&queries).await;

    assert_eq!(downloader.summary().total_duration, "1:00:05");
    assert_eq!(downloader.summary().failed, 1);
}

#[tokio::test]
async fn test_lyrics_disabled_by_flag() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "Daft Punk - One More Time\n");
    let catalog = FakeCatalog::new(dir.path()).with_track(
        "Daft Punk - One More Time",
        "One More Time",
        "Daft Punk",
        320_357,
    );

    let mut downloader = create_downloader(
        &dir,
        catalog,
        FakeLyrics::active(Some("One more time\nWe're gonna celebrate")),
        false,
        LyricsLayout::Subfolder,
    );
    let stats = downloader.process_file(&input).await.clone();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(downloader.lyrics_state(), LyricsState::Disabled);
    assert!(!dir.path().join("lyrics").exists());
    assert!(
        !downloader
            .presenter()
            .log_lines()
            .iter()
            .any(|l| mentions_lyrics(l))
    );
}

#[tokio::test]
async fn test_inactive_lyrics_source_warns_once() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "A - One\nB - Two\nC - Three\n");
    let catalog = FakeCatalog::new(dir.path())
        .with_track("A - One", "One", "A", 1_000)
        .with_track("B - Two", "Two", "B", 1_000)
        .with_track("C - Three", "Three", "C", 1_000);

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), true, LyricsLayout::Subfolder);
    let stats = downloader.process_file(&input).await.clone();

    assert_eq!(stats.succeeded, 3);
    assert_eq!(downloader.lyrics_state(), LyricsState::DisabledThisRun);

    let lyrics_lines: Vec<&str> = downloader
        .presenter()
        .log_lines()
        .into_iter()
        .filter(|l| mentions_lyrics(l))
        .collect();
    assert_eq!(lyrics_lines.len(), 1);
    assert!(lyrics_lines[0].contains("Genius API token not found"));
    assert!(!dir.path().join("lyrics").exists());
}

#[tokio::test]
async fn test_lyrics_written_to_subfolder() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "Daft Punk - One More Time\n");
    let catalog = FakeCatalog::new(dir.path()).with_track(
        "Daft Punk - One More Time",
        "One More Time",
        "Daft Punk",
        320_357,
    );

    let mut downloader = create_downloader(
        &dir,
        catalog,
        FakeLyrics::active(Some("One more time\nWe're gonna celebrate")),
        true,
        LyricsLayout::Subfolder,
    );
    downloader.process_file(&input).await;

    let lyrics_file = dir
        .path()
        .join("lyrics")
        .join("Daft Punk - One More Time.lrc");
    assert_eq!(
        std::fs::read_to_string(lyrics_file).unwrap(),
        "One more time\nWe're gonna celebrate"
    );
    assert_eq!(downloader.lyrics_state(), LyricsState::Enabled);
}

#[tokio::test]
async fn test_lyrics_written_alongside_audio() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "Daft Punk - One More Time\n");
    let catalog = FakeCatalog::new(dir.path()).with_track(
        "Daft Punk - One More Time",
        "One More Time",
        "Daft Punk",
        320_357,
    );

    let mut downloader = create_downloader(
        &dir,
        catalog,
        FakeLyrics::active(Some("One more time")),
        true,
        LyricsLayout::Alongside,
    );
    downloader.process_file(&input).await;

    assert!(dir.path().join("Daft Punk - One More Time.lrc").is_file());
    assert!(dir.path().join("Daft Punk - One More Time.mp3").is_file());
    assert!(!dir.path().join("lyrics").exists());
}

#[tokio::test]
async fn test_missing_lyrics_do_not_change_classification() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "A - One\nB - Two\n");
    let catalog = FakeCatalog::new(dir.path())
        .with_track("A - One", "One", "A", 1_000)
        .with_track("B - Two", "Two", "B", 1_000);

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::active(None), true, LyricsLayout::Subfolder);
    let stats = downloader.process_file(&input).await.clone();

    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 0);
    assert!(
        downloader
            .presenter()
            .log_lines()
            .iter()
            .any(|l| l.contains("Lyrics for One not found"))
    );
}

#[tokio::test]
async fn test_preview_resolves_without_downloading() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = FakeCatalog::new(dir.path()).with_track(
        "Daft Punk - One More Time",
        "One More Time",
        "Daft Punk",
        320_357,
    );
    catalog.erroring_queries.insert("Broken".to_string());

    let queries: Vec<Query> = ["Daft Punk - One More Time", "NoSuchSongXYZ123", "Broken"]
        .iter()
        .filter_map(|q| Query::new(q))
        .collect();

    let mut downloader =
        create_downloader(&dir, catalog, FakeLyrics::inactive(), true, LyricsLayout::Subfolder);
    let matches = downloader.preview(&queries).await;

    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].1.as_ref().unwrap().name, "One More Time");
    assert!(matches[1].1.is_none());
    assert!(matches[2].1.is_none());
    assert_eq!(downloader.catalog().materialized, 0);
    assert_eq!(downloader.stats().processed(), 0);
    assert_eq!(downloader.presenter().count_level(Level::Error), 1);
}
