use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use super::model::{AuthErrorBody, TokenResponse};
use crate::{config::SpotifyCredentials, error::CatalogError};

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    /// A lifetime too large to represent leaves the token already stale.
    fn new(value: String, expires_in: u64, now: Instant) -> Self {
        Self {
            value,
            expires_at: now
                .checked_add(Duration::from_secs(expires_in))
                .unwrap_or(now),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now.checked_add(EXPIRY_MARGIN)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

/// Client-credentials token, fetched lazily and shared by all requests.
pub struct TokenCache {
    credentials: SpotifyCredentials,
    token_url: String,
    current: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(credentials: SpotifyCredentials, token_url: impl Into<String>) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            current: Mutex::new(None),
        }
    }

    pub async fn bearer(&self, http: &reqwest::Client) -> Result<String, CatalogError> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request(http).await?;
        let value = token.value.clone();
        *current = Some(token);
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    async fn request(&self, http: &reqwest::Client) -> Result<AccessToken, CatalogError> {
        let response = http
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<AuthErrorBody>().await {
                Ok(body) => body.error_description.unwrap_or(body.error),
                Err(_) => status.to_string(),
            };
            return Err(CatalogError::Auth(reason));
        }

        let body: TokenResponse = response.json().await?;
        debug!(expires_in = body.expires_in, "spotify_token_refreshed");

        Ok(AccessToken::new(body.access_token, body.expires_in, Instant::now()))
    }
}
