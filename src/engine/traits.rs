use super::types::FetchOutcome;

/// One bounded GET. Implementations never retry; retry policy lives in the processor.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}
