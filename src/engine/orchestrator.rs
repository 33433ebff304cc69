use super::processor::SourceProcessor;
use super::types::{EntryOutcome, RetryReason, SkipReason};
use crate::source::SourceEntry;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Outcomes of one pass, keyed by `original_index`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub outcomes: BTreeMap<usize, EntryOutcome>,
}

impl PassOutcome {
    /// Indices of entries that should be attempted again.
    pub fn retry_set(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_retry())
            .map(|(idx, _)| *idx)
            .collect()
    }

    pub fn written(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_written()).count()
    }
}

/// Runs the processor over a batch of entries, one task per entry.
#[derive(Clone)]
pub struct Orchestrator {
    processor: SourceProcessor,
    concurrency: usize,
}

impl Orchestrator {
    /// `concurrency == 0` launches every entry at once.
    pub fn new(processor: SourceProcessor, concurrency: usize) -> Self {
        Self {
            processor,
            concurrency,
        }
    }

    pub async fn run(&self, entries: &[SourceEntry]) -> PassOutcome {
        let semaphore = (self.concurrency > 0).then(|| Arc::new(Semaphore::new(self.concurrency)));
        let mut outcomes = BTreeMap::new();
        let mut handles = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.is_dead() {
                info!("{}; dead -> skip download", entry);
                outcomes.insert(entry.original_index, EntryOutcome::Skipped(SkipReason::Dead));
                continue;
            }

            let processor = self.processor.clone();
            let semaphore = semaphore.clone();
            let entry = entry.clone();
            let idx = entry.original_index;

            let handle = tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(s) => s.acquire_owned().await.ok(),
                    None => None,
                };
                processor.process(&entry).await
            });
            handles.push((idx, handle));
        }

        // Collect only after every task has resolved; tasks never touch shared state.
        let joined = join_all(
            handles
                .into_iter()
                .map(|(idx, handle)| async move { (idx, handle.await) }),
        )
        .await;

        for (idx, result) in joined {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Task for entry #{} aborted: {}", idx, e);
                    EntryOutcome::Retry(RetryReason::TaskAborted(e.to_string()))
                }
            };
            outcomes.insert(idx, outcome);
        }

        let pass = PassOutcome { outcomes };
        info!(
            "Pass complete: {} entries, {} written, {} to retry",
            pass.outcomes.len(),
            pass.written(),
            pass.retry_set().len()
        );
        pass
    }
}
