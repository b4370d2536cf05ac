use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;

use super::{LyricsError, LyricsSource};
use crate::{
    config::Settings,
    types::{GeniusHit, GeniusSearchResponse},
};

const CONTAINER_MARKER: &str = "data-lyrics-container=\"true\"";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid numeric entity regex")
});

/// Genius search API plus song page scraping.
pub struct GeniusClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GeniusClient {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_url: settings.genius_api_url.clone(),
            token: settings.genius_token.clone(),
        }
    }

    /// Picks the first song hit credited to `artist_name`, else the first song hit.
    pub fn pick_hit<'a>(hits: &'a [GeniusHit], artist_name: &str) -> Option<&'a GeniusHit> {
        let artist = artist_name.to_lowercase();
        let songs = || hits.iter().filter(|h| h.kind == "song");

        songs()
            .find(|h| {
                h.result.primary_artist.as_ref().is_some_and(|a| {
                    let name = a.name.to_lowercase();
                    name.contains(&artist) || artist.contains(&name)
                })
            })
            .or_else(|| songs().next())
    }
}

impl LyricsSource for GeniusClient {
    fn is_active(&self) -> bool {
        self.token.is_some()
    }

    async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<Option<String>, LyricsError> {
        let Some(token) = &self.token else {
            return Ok(None);
        };

        let search_url = format!("{uri}/search", uri = self.api_url);
        let json = self
            .client
            .get(&search_url)
            .query(&[("q", format!("{} {}", track_name, artist_name))])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<GeniusSearchResponse>()
            .await?;

        let Some(hit) = Self::pick_hit(&json.response.hits, artist_name) else {
            return Ok(None);
        };

        let html = self
            .client
            .get(&hit.result.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_lyrics(&html))
    }
}

/// Extracts the plain text of every lyrics container on a Genius song page.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut rest = html;

    while let Some(marker) = rest.find(CONTAINER_MARKER) {
        let after_marker = &rest[marker..];
        let Some(open_end) = after_marker.find('>') else {
            break;
        };
        let body = &after_marker[open_end + 1..];
        let end = matching_div_end(body);

        let with_breaks = LINE_BREAK.replace_all(&body[..end], "\n");
        let text = decode_entities(&TAG.replace_all(&with_breaks, ""));
        if !text.trim().is_empty() {
            blocks.push(text.trim().to_string());
        }

        rest = &body[end..];
    }

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

/// Offset of the `</div>` closing the container whose body starts at `body`.
fn matching_div_end(body: &str) -> usize {
    let mut depth = 0usize;
    let mut pos = 0usize;

    loop {
        let next_open = body[pos..].find("<div").map(|i| pos + i);
        let next_close = body[pos..].find("</div").map(|i| pos + i);

        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                depth += 1;
                pos = open + 4;
            }
            (_, Some(close)) => {
                if depth == 0 {
                    return close;
                }
                depth -= 1;
                pos = close + 5;
            }
            (_, None) => return body.len(),
        }
    }
}

pub fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let value = &caps[1];
        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => value.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
