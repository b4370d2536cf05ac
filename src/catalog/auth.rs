use chrono::Utc;
use reqwest::Client;

use super::CatalogError;
use crate::types::AccessToken;

/// Seconds before expiry at which a token is considered stale.
const EXPIRY_BUFFER_SECS: u64 = 240;

/// Holds an app-only Spotify token obtained with the client credentials flow.
///
/// The token lives in memory for the duration of one session only.
pub struct TokenManager {
    client: Client,
    token_url: String,
    credentials: Option<(String, String)>,
    token: Option<AccessToken>,
}

impl TokenManager {
    pub fn new(
        client: Client,
        token_url: String,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        let credentials = match (client_id, client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        };

        TokenManager {
            client,
            token_url,
            credentials,
            token: None,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn get_valid_token(&mut self) -> Result<String, CatalogError> {
        if let Some(token) = &self.token {
            if !Self::is_expired(token, Utc::now().timestamp() as u64) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        self.token = Some(token);
        Ok(access_token)
    }

    pub fn is_expired(token: &AccessToken, now: u64) -> bool {
        now + EXPIRY_BUFFER_SECS >= token.obtained_at + token.expires_in
    }

    async fn request_token(&self) -> Result<AccessToken, CatalogError> {
        let Some((client_id, client_secret)) = &self.credentials else {
            return Err(CatalogError::MissingCredentials);
        };

        let res = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CatalogError::Api(format!(
                "token request failed with {}: {}",
                status,
                body.trim()
            )));
        }

        let mut token: AccessToken = res.json().await?;
        token.obtained_at = Utc::now().timestamp() as u64;
        Ok(token)
    }
}
