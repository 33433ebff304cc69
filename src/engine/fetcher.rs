use super::traits::Fetcher;
use super::types::FetchOutcome;
use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// reqwest-backed fetcher. Clones share one connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.total_timeout())
            .build()?;
        Ok(Self { client })
    }
}

fn classify(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_builder() {
        FetchError::InvalidRequest(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::Failed(classify(&e)),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            return FetchOutcome::Failed(FetchError::HttpStatus(status.as_u16()));
        }

        match resp.text().await {
            Ok(body) if body.is_empty() => FetchOutcome::Empty,
            Ok(body) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                FetchOutcome::Body(body)
            }
            Err(e) => FetchOutcome::Failed(classify(&e)),
        }
    }
}
