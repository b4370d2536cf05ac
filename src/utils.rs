use std::path::PathBuf;

use crate::types::{PreviewTableRow, Query, ResolvedTrack};

/// Characters that are not allowed in file names on common platforms.
const INVALID_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Splits file content into queries, dropping blank lines.
pub fn parse_queries(content: &str) -> Vec<Query> {
    content.lines().filter_map(Query::new).collect()
}

pub fn clean_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect()
}

/// Formats milliseconds as `H:MM:SS`, dropping the sub-second part.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

/// Value parser for `--input`: the path must exist and be a regular file.
pub fn parse_input_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("file '{}' does not exist", value));
    }
    if !path.is_file() {
        return Err(format!("'{}' is not a file", value));
    }
    std::fs::File::open(&path).map_err(|e| format!("cannot read '{}': {}", value, e))?;
    Ok(path)
}

pub fn preview_rows(matches: &[(Query, Option<ResolvedTrack>)]) -> Vec<PreviewTableRow> {
    matches
        .iter()
        .map(|(query, track)| match track {
            Some(t) => PreviewTableRow {
                query: query.to_string(),
                track: t.name.clone(),
                artists: t.display_artists(),
                duration: format_duration(t.duration_ms),
            },
            None => PreviewTableRow {
                query: query.to_string(),
                track: "-".to_string(),
                artists: "-".to_string(),
                duration: "-".to_string(),
            },
        })
        .collect()
}
