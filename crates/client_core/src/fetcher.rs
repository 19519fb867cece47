use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Account,
    error::ApiError,
    protocol::{account_refresh_route, RefreshAccountRequest},
};
use url::Url;

use crate::error::FetchError;

/// Source of updated account snapshots.
///
/// Implementations receive the snapshot the caller currently holds and may use
/// it to compute a delta or ignore it and return a full snapshot.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    async fn fetch(&self, current: &Account) -> Result<Account, FetchError>;
}

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpAccountFetcher {
    http: Client,
    server_url: String,
}

impl HttpAccountFetcher {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(server_url)
            .with_context(|| format!("invalid account server url '{server_url}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build account HTTP client")?;
        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl AccountFetcher for HttpAccountFetcher {
    async fn fetch(&self, current: &Account) -> Result<Account, FetchError> {
        let response = self
            .http
            .post(format!("{}{}", self.server_url, account_refresh_route()))
            .json(&RefreshAccountRequest {
                account: current.clone(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(match serde_json::from_slice::<ApiError>(&body) {
                Ok(api_error) => FetchError::from_api_error(api_error),
                Err(_) => FetchError::Status(status.as_u16()),
            });
        }

        response
            .json::<Account>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
