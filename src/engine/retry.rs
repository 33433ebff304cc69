use super::orchestrator::Orchestrator;
use super::types::EntryOutcome;
use crate::source::SourceEntry;
use crate::stats::RunReport;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Initial,
    /// 1-based retry pass number.
    Retry(u32),
}

impl PassKind {
    /// The pass after this one, if the retry budget allows it.
    pub fn next(self, retry_passes: u32) -> Option<PassKind> {
        let n = match self {
            PassKind::Initial => 1,
            PassKind::Retry(n) => n + 1,
        };
        (n <= retry_passes).then_some(PassKind::Retry(n))
    }
}

/// Runs the initial pass plus up to `retry_passes` passes over entries left in `Retry`.
pub struct RetryCoordinator {
    orchestrator: Orchestrator,
    retry_passes: u32,
}

impl RetryCoordinator {
    pub fn new(orchestrator: Orchestrator, retry_passes: u32) -> Self {
        Self {
            orchestrator,
            retry_passes,
        }
    }

    pub async fn run(&self, entries: &[SourceEntry]) -> RunReport {
        let mut outcomes: BTreeMap<usize, EntryOutcome> = BTreeMap::new();
        let mut batch: Vec<SourceEntry> = entries.to_vec();
        let mut state = PassKind::Initial;
        let mut passes = 0;

        loop {
            match state {
                PassKind::Initial => info!("Downloading {} blocklists", batch.len()),
                PassKind::Retry(n) => info!(
                    "Retry download blocklist: pass {}/{}, {} entries",
                    n,
                    self.retry_passes,
                    batch.len()
                ),
            }

            let pass = self.orchestrator.run(&batch).await;
            passes += 1;

            let retry: FxHashSet<usize> = pass.retry_set().into_iter().collect();
            // Later passes replace earlier outcomes for the same entry.
            outcomes.extend(pass.outcomes);

            if state == PassKind::Initial {
                let written = outcomes.values().filter(|o| o.is_written()).count();
                info!(
                    "Total blocklists: {}, Saved: {}, Difference: {}",
                    entries.len(),
                    written,
                    entries.len() - written
                );
            }

            if retry.is_empty() {
                break;
            }
            let Some(next) = state.next(self.retry_passes) else {
                break;
            };

            state = next;
            batch = entries
                .iter()
                .filter(|e| retry.contains(&e.original_index))
                .cloned()
                .collect();
        }

        RunReport::from_outcomes(entries, &outcomes, passes)
    }
}
