//! Spotify Batch Downloader Library
//!
//! This library reads a plain text list of song queries, resolves every query
//! on Spotify, downloads the matching audio through `yt-dlp` and optionally
//! stores the lyrics found on Genius next to it. Queries are processed one at a
//! time and every step is reported to a terminal presenter.
//!
//! # Modules
//!
//! - `catalog` - Spotify search and audio materialization adapters
//! - `cli` - Command implementations used by the binary
//! - `config` - Configuration management and environment variables
//! - `downloader` - The batch orchestrator and its session statistics
//! - `lyrics` - Lyrics lookup with a filename based cache
//! - `types` - Data structures and type definitions
//! - `ui` - Presentation events and terminal rendering
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotify_downloader::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotify_downloader::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod lyrics;
pub mod types;
pub mod ui;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary boundary where any error ends the process. Library
/// components return their own error enums instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Found {} queries", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Downloaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only meant
/// for fatal errors outside of the per-query processing loop.
///
/// # Example
///
/// ```
/// error!("Cannot create output directory: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Spotify credentials are missing");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
