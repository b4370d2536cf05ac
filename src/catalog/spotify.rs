use reqwest::{Client, StatusCode};

use super::{CatalogError, TokenManager};
use crate::{
    config::Settings,
    types::{ResolvedTrack, SearchResponse, SearchTerms},
};

/// Thin client for the Spotify Web API search endpoint.
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token_mgr: TokenManager,
}

impl SpotifyClient {
    pub fn new(client: Client, settings: &Settings) -> Self {
        let token_mgr = TokenManager::new(
            client.clone(),
            settings.spotify_token_url.clone(),
            settings.spotify_client_id.clone(),
            settings.spotify_client_secret.clone(),
        );

        Self {
            client,
            api_url: settings.spotify_api_url.clone(),
            token_mgr,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.token_mgr.has_credentials()
    }

    /// Returns the best matching track for the search terms.
    ///
    /// Uses `GET /search?type=track&limit=1`. Rate limiting is reported as an
    /// error for this query, nothing is retried.
    pub async fn search_track(
        &mut self,
        terms: &SearchTerms,
    ) -> Result<Option<ResolvedTrack>, CatalogError> {
        let token = self.token_mgr.get_valid_token().await?;
        let api_url = format!("{uri}/search", uri = self.api_url);

        let response = self
            .client
            .get(&api_url)
            .query(&[
                ("q", terms.to_catalog_query().as_str()),
                ("type", "track"),
                ("limit", "1"),
            ])
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string();
            return Err(CatalogError::Api(format!(
                "rate limited, retry after {} seconds",
                retry_after
            )));
        }

        let json = response.error_for_status()?.json::<SearchResponse>().await?;

        Ok(json.tracks.items.into_iter().next().map(ResolvedTrack::from))
    }
}
