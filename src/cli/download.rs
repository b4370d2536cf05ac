use std::path::PathBuf;

use crate::{
    Res,
    catalog::{AudioDownloader, SpotifyCatalog, SpotifyClient},
    config::Settings,
    downloader::{BatchDownloader, DownloadOptions},
    info,
    lyrics::{GeniusClient, LyricsFetcher},
    types::LyricsLayout,
    ui::{self, TerminalPresenter},
    utils, warning,
};

#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lyrics: bool,
    pub lyrics_layout: LyricsLayout,
    pub bitrate: Option<String>,
    pub format: Option<String>,
}

type TerminalDownloader = BatchDownloader<SpotifyCatalog, GeniusClient, TerminalPresenter>;

async fn build(args: &DownloadArgs) -> Res<TerminalDownloader> {
    let mut settings = Settings::from_env();
    if let Some(bitrate) = &args.bitrate {
        settings.audio_bitrate = bitrate.clone();
    }
    if let Some(format) = &args.format {
        settings.audio_format = format.clone();
    }

    let http = settings.http_client()?;
    let catalog = SpotifyCatalog::new(
        SpotifyClient::new(http.clone(), &settings),
        AudioDownloader::new(&args.output, &settings),
    );
    if !catalog.has_credentials() {
        warning!(
            "Spotify credentials are not configured. Set SPOTIFY_API_AUTH_CLIENT_ID and SPOTIFY_API_AUTH_CLIENT_SECRET."
        );
    }

    let lyrics = LyricsFetcher::new(GeniusClient::new(http, &settings));
    let options = DownloadOptions {
        output_dir: args.output.clone(),
        lyrics: args.lyrics,
        lyrics_layout: args.lyrics_layout,
    };

    Ok(BatchDownloader::new(
        catalog,
        lyrics,
        TerminalPresenter::new(),
        options,
    ))
}

/// Downloads every track listed in the input file and prints the summary.
pub async fn download(args: DownloadArgs) -> Res<()> {
    async_fs::create_dir_all(&args.output)
        .await
        .map_err(|e| format!("cannot create {}: {}", args.output.display(), e))?;

    let mut downloader = build(&args).await?;
    downloader.header();
    downloader.process_file(&args.input).await;
    downloader.finish();
    Ok(())
}

/// Resolves the input file on Spotify and prints the matches as a table.
///
/// Nothing is written to disk.
pub async fn preview(args: DownloadArgs) -> Res<()> {
    let mut downloader = build(&args).await?;
    downloader.header();

    let queries = match downloader.load_queries(&args.input).await {
        Ok(queries) if !queries.is_empty() => queries,
        _ => return Ok(()),
    };

    let matches = downloader.preview(&queries).await;
    let found = matches.iter().filter(|(_, t)| t.is_some()).count();
    println!("{}", ui::render_preview(utils::preview_rows(&matches)));
    info!("{} of {} queries matched a track.", found, matches.len());
    Ok(())
}
