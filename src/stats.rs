use crate::engine::EntryOutcome;
use crate::source::SourceEntry;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub index: usize,
    pub description: String,
    pub outcome: EntryOutcome,
}

/// Final tally of a run, derived from the merged outcome map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    /// `ignore`-tagged entries that still failed; reported, never fatal.
    pub not_downloaded: Vec<FailedEntry>,
    /// Mandatory entries that still failed; any of these fails the run.
    pub failed: Vec<FailedEntry>,
    pub passes: u32,
}

impl RunReport {
    pub fn from_outcomes(
        entries: &[SourceEntry],
        outcomes: &BTreeMap<usize, EntryOutcome>,
        passes: u32,
    ) -> Self {
        let mut report = RunReport {
            total: entries.len(),
            passes,
            ..Default::default()
        };

        let mut sorted: Vec<&SourceEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| e.original_index);

        for entry in sorted {
            let Some(outcome) = outcomes.get(&entry.original_index) else {
                continue;
            };
            match outcome {
                EntryOutcome::Written { .. } => report.written += 1,
                EntryOutcome::Skipped(_) => report.skipped += 1,
                EntryOutcome::Retry(_) | EntryOutcome::Failed(_) => {
                    let failure = FailedEntry {
                        index: entry.original_index,
                        description: entry.to_string(),
                        outcome: outcome.clone(),
                    };
                    if entry.is_ignored() {
                        report.not_downloaded.push(failure);
                    } else {
                        report.failed.push(failure);
                    }
                }
            }
        }

        report
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn log_summary(&self) {
        info!(
            "Total blocklists: {}, Saved: {}, Skipped: {}, Difference: {} ({} passes)",
            self.total,
            self.written,
            self.skipped,
            self.total - self.written,
            self.passes
        );

        if !self.not_downloaded.is_empty() {
            warn!("Failed download list (ignored, try later):");
            for f in &self.not_downloaded {
                warn!("  {} -> {}", f.description, f.outcome);
            }
        }

        if !self.failed.is_empty() {
            error!("Error downloading blocklist:");
            for f in &self.failed {
                error!("  {} -> {}", f.description, f.outcome);
            }
        }
    }
}
