pub mod auth;
pub mod model;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, header::RETRY_AFTER};
use tracing::info;

use self::{
    auth::{TOKEN_URL, TokenCache},
    model::{ApiErrorBody, SearchResponse},
};
use super::USER_AGENT;
use crate::{
    catalog::{Catalog, CatalogItem, Category},
    config::SpotifyCredentials,
    error::CatalogError,
};

const API_BASE: &str = "https://api.spotify.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SpotifyClient {
    http: reqwest::Client,
    api_base: String,
    tokens: TokenCache,
    search_limit: u32,
}

impl SpotifyClient {
    /// Builds the client and fetches the first token, so bad credentials fail
    /// here rather than on the first search.
    pub async fn connect(
        credentials: SpotifyCredentials,
        search_limit: u32,
    ) -> Result<Self, CatalogError> {
        Self::connect_with_endpoints(credentials, search_limit, API_BASE, TOKEN_URL).await
    }

    pub async fn connect_with_endpoints(
        credentials: SpotifyCredentials,
        search_limit: u32,
        api_base: &str,
        token_url: &str,
    ) -> Result<Self, CatalogError> {
        let client = Self::with_endpoints(credentials, search_limit, api_base, token_url)?;
        client.tokens.bearer(&client.http).await?;
        info!("Spotify client authorized");
        Ok(client)
    }

    pub fn with_endpoints(
        credentials: SpotifyCredentials,
        search_limit: u32,
        api_base: &str,
        token_url: &str,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            tokens: TokenCache::new(credentials, token_url),
            search_limit,
        })
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search(
        &self,
        query: &str,
        category: Category,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let token = self.tokens.bearer(&self.http).await?;
        let limit = self.search_limit.to_string();

        let response = self
            .http
            .get(format!("{}/search", self.api_base))
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", category.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.tokens.invalidate().await;
                Err(CatalogError::Auth(error_message(response).await))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited {
                retry_after: retry_after(&response),
            }),
            status if !status.is_success() => Err(CatalogError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
            _ => {
                let body: SearchResponse = response.json().await?;
                Ok(body.into_catalog_items(category))
            }
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => status.to_string(),
    }
}
