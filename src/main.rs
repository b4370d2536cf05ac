use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_downloader::{cli, config, error, types::LyricsLayout, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  after_help="Example: spotify-downloader --input songs.txt --output ./Music --lyrics",
  styles=styles(),
  args_conflicts_with_subcommands = true, // disallow mixing download flags with `completions`
  subcommand_negates_reqs = true
)]
struct Cli {
    /// Path to a .txt file with one track query per line
    #[clap(short, long, required = true, value_parser = utils::parse_input_file)]
    input: Option<PathBuf>,

    /// Directory for the downloaded tracks, created if missing
    #[clap(short, long, required = true)]
    output: Option<PathBuf>,

    /// Download lyrics (default)
    #[clap(short = 'l', long, overrides_with = "no_lyrics")]
    lyrics: bool,

    /// Do not download lyrics
    #[clap(long, overrides_with = "lyrics")]
    no_lyrics: bool,

    /// Where lyrics files are written
    #[clap(long, value_enum, default_value_t = LyricsLayout::Subfolder)]
    lyrics_layout: LyricsLayout,

    /// Audio bitrate handed to the encoder (e.g. 320k)
    #[clap(long)]
    bitrate: Option<String>,

    /// Audio file format (e.g. mp3, m4a, opus)
    #[clap(long)]
    format: Option<String>,

    /// Only search the queries and print the matches
    #[clap(long)]
    dry_run: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        error!("Both --input and --output are required.");
    };

    let args = cli::DownloadArgs {
        input,
        output,
        lyrics: cli.lyrics || !cli.no_lyrics,
        lyrics_layout: cli.lyrics_layout,
        bitrate: cli.bitrate,
        format: cli.format,
    };

    let result = if cli.dry_run {
        cli::preview(args).await
    } else {
        cli::download(args).await
    };

    if let Err(e) = result {
        error!("A critical error occurred: {}", e);
    }
}
