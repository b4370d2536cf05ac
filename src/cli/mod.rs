//! # CLI Module
//!
//! Command implementations behind the binary's argument parser. Each command
//! builds the adapters from [`crate::config::Settings`], wires them into a
//! [`crate::downloader::BatchDownloader`] with a terminal presenter and runs
//! it.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotify-downloader --input songs.txt --output ./Music
//! spotify-downloader -i songs.txt -o ./Music --no-lyrics
//! spotify-downloader -i songs.txt -o ./Music --lyrics-layout alongside
//! spotify-downloader -i songs.txt -o ./Music --dry-run
//! ```

mod download;

pub use download::DownloadArgs;
pub use download::download;
pub use download::preview;
