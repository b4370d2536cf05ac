use std::path::{Path, PathBuf};

use tokio::process::Command;

use super::CatalogError;
use crate::{config::Settings, types::ResolvedTrack, utils};

/// Downloads audio for resolved tracks with the external `yt-dlp` binary.
///
/// Files are named `"{artist} - {title}.{ext}"` inside the output directory.
/// `ffmpeg` does the audio extraction and transcoding; without an explicit
/// location `yt-dlp` looks it up on `PATH`.
pub struct AudioDownloader {
    ytdlp: String,
    ffmpeg: Option<String>,
    output_dir: PathBuf,
    format: String,
    bitrate: String,
}

/// File extension `yt-dlp` writes for an `--audio-format` value.
pub fn audio_extension(format: &str) -> &str {
    match format {
        "vorbis" => "ogg",
        "aac" | "alac" => "m4a",
        other => other,
    }
}

impl AudioDownloader {
    pub fn new(output_dir: &Path, settings: &Settings) -> Self {
        Self {
            ytdlp: settings.ytdlp_path.clone(),
            ffmpeg: settings.ffmpeg_path.clone(),
            output_dir: output_dir.to_path_buf(),
            format: settings.audio_format.clone(),
            bitrate: settings.audio_bitrate.clone(),
        }
    }

    fn file_stem(track: &ResolvedTrack) -> String {
        format!(
            "{} - {}",
            utils::clean_filename(&track.artist),
            utils::clean_filename(&track.name)
        )
    }

    /// Expected location of the audio file for `track`.
    pub fn target_path(&self, track: &ResolvedTrack) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            Self::file_stem(track),
            audio_extension(&self.format)
        ))
    }

    /// `yt-dlp` output template for `track`; `%` is escaped for the template engine.
    pub fn output_template(&self, track: &ResolvedTrack) -> PathBuf {
        self.output_dir
            .join(format!("{}.%(ext)s", Self::file_stem(track).replace('%', "%%")))
    }

    /// Search string handed to the `ytsearch1:` extractor.
    pub fn search_source(track: &ResolvedTrack) -> String {
        format!("ytsearch1:{} - {}", track.display_artists(), track.name)
    }

    /// Arguments passed to `yt-dlp` for `track`.
    pub fn command_args(&self, track: &ResolvedTrack) -> Vec<String> {
        let mut args: Vec<String> = [
            "--extract-audio",
            "--no-playlist",
            "--quiet",
            "--no-warnings",
            "--no-progress",
        ]
        .iter()
        .map(|a| a.to_string())
        .collect();

        args.push("--audio-format".to_string());
        args.push(self.format.clone());
        args.push("--audio-quality".to_string());
        args.push(self.bitrate.to_uppercase());
        if let Some(ffmpeg) = &self.ffmpeg {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.clone());
        }
        args.push("--output".to_string());
        args.push(self.output_template(track).to_string_lossy().into_owned());
        args.push(Self::search_source(track));
        args
    }

    /// Finds the audio file of `track`, whatever extension it ended up with.
    async fn existing_file(&self, track: &ResolvedTrack) -> Option<PathBuf> {
        let target = self.target_path(track);
        if target.is_file() {
            return Some(target);
        }

        let stem = Self::file_stem(track);
        let mut entries = tokio::fs::read_dir(&self.output_dir).await.ok()?;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let same_stem = path.file_stem().is_some_and(|s| s.to_string_lossy() == stem);
            let skipped = path
                .extension()
                .is_some_and(|e| e == "part" || e == "lrc");
            if same_stem && !skipped && path.is_file() {
                return Some(path);
            }
        }
        None
    }

    /// Downloads `track`, skipping the work when the file already exists.
    ///
    /// Returns `Ok(None)` when `yt-dlp` exits unsuccessfully or produced no
    /// file, and an error only when the process cannot be run at all.
    pub async fn download(&self, track: &ResolvedTrack) -> Result<Option<PathBuf>, CatalogError> {
        if let Some(existing) = self.existing_file(track).await {
            return Ok(Some(existing));
        }

        let out = Command::new(&self.ytdlp)
            .args(self.command_args(track))
            .output()
            .await
            .map_err(|e| CatalogError::Process(format!("cannot run {}: {}", self.ytdlp, e)))?;

        if !out.status.success() {
            return Ok(None);
        }

        Ok(self.existing_file(track).await)
    }
}
