use super::extractor::{extract_domains, join_domains};
use super::traits::Fetcher;
use super::types::{EntryOutcome, FetchOutcome, RetryReason, SkipReason};
use super::writer;
use crate::config::FetchConfig;
use crate::source::{Format, SourceEntry};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Runs one entry end to end: fetch every (url, format) pair, extract, write.
#[derive(Clone)]
pub struct SourceProcessor {
    fetcher: Arc<dyn Fetcher>,
    output_dir: PathBuf,
    name_map: Arc<HashMap<usize, String>>,
    attempts: u32,
    retry_delay: Duration,
    min_domains: usize,
}

impl SourceProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        output_dir: impl Into<PathBuf>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
            name_map: Arc::new(HashMap::new()),
            attempts: config.attempts.max(1),
            retry_delay: config.retry_delay(),
            min_domains: config.min_domains,
        }
    }

    pub fn with_name_map(mut self, name_map: HashMap<usize, String>) -> Self {
        self.name_map = Arc::new(name_map);
        self
    }

    pub fn output_path(&self, entry: &SourceEntry) -> PathBuf {
        let stem = self
            .name_map
            .get(&entry.original_index)
            .cloned()
            .unwrap_or_else(|| entry.original_index.to_string());
        writer::output_path(&self.output_dir, &entry.group, &entry.subgroup, &stem)
    }

    pub async fn process(&self, entry: &SourceEntry) -> EntryOutcome {
        if entry.is_dead() {
            info!("{}; dead -> skip download", entry);
            return EntryOutcome::Skipped(SkipReason::Dead);
        }
        if entry.sources.is_empty() {
            warn!("{}; no usable url/format -> skip download", entry);
            return EntryOutcome::Skipped(SkipReason::NoSources);
        }

        let path = self.output_path(entry);
        let mut parts = Vec::with_capacity(entry.sources.len());
        let mut total = 0;

        for source in &entry.sources {
            info!("src: {} | dst: {}", source.url, path.display());

            let Some(body) = self.fetch_with_retry(&source.url).await else {
                continue;
            };

            let domains = extract_domains(&body, source.format);
            if domains.is_empty() {
                warn!("No {} entries found in {}", source.format, source.url);
                continue;
            }
            if source.format != Format::Wildcard && domains.len() < self.min_domains {
                warn!(
                    "Only {} domains in {} (minimum {}), discarding",
                    domains.len(),
                    source.url,
                    self.min_domains
                );
                continue;
            }

            total += domains.len();
            parts.push(join_domains(domains));
        }

        let text = parts.join("\n");
        match writer::write(&path, &text) {
            Ok(true) => EntryOutcome::Written {
                path,
                domains: total,
            },
            Ok(false) => {
                warn!("Nothing to write for {}", entry);
                EntryOutcome::Retry(RetryReason::NothingExtracted)
            }
            Err(e) => {
                error!("Write failed for {}: {}", entry, e);
                EntryOutcome::Failed(e.to_string())
            }
        }
    }

    async fn fetch_with_retry(&self, url: &str) -> Option<String> {
        for attempt in 1..=self.attempts {
            let outcome = self.fetcher.fetch(url).await;
            let again = outcome.is_retryable() && attempt < self.attempts;

            match outcome {
                FetchOutcome::Body(body) => return Some(body),
                FetchOutcome::Empty => {
                    warn!("Empty body from {} (attempt {}/{})", url, attempt, self.attempts)
                }
                FetchOutcome::Failed(e) => {
                    warn!("Err downloading {} (attempt {}/{}): {}", url, attempt, self.attempts, e)
                }
            }

            if !again {
                break;
            }
            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        None
    }
}
