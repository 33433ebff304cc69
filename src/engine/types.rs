use crate::error::FetchError;
use std::fmt;
use std::path::PathBuf;

/// Result of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    /// Reachable server, 200, nothing in it. Usually a dead list rather than a network fault.
    Empty,
    Failed(FetchError),
}

impl FetchOutcome {
    /// Whether another attempt within the same pass could change the result.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchOutcome::Body(_) => false,
            FetchOutcome::Empty => true,
            FetchOutcome::Failed(e) => !e.is_permanent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    NothingExtracted,
    TaskAborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Dead,
    NoSources,
}

/// Per-entry result of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Written { path: PathBuf, domains: usize },
    Retry(RetryReason),
    Skipped(SkipReason),
    Failed(String),
}

impl EntryOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, EntryOutcome::Written { .. })
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, EntryOutcome::Retry(_))
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Written { path, domains } => {
                write!(f, "written {} domains to {}", domains, path.display())
            }
            EntryOutcome::Retry(RetryReason::NothingExtracted) => {
                f.write_str("nothing extracted, retry later")
            }
            EntryOutcome::Retry(RetryReason::TaskAborted(why)) => {
                write!(f, "task aborted ({}), retry later", why)
            }
            EntryOutcome::Skipped(SkipReason::Dead) => f.write_str("dead, skipped"),
            EntryOutcome::Skipped(SkipReason::NoSources) => {
                f.write_str("no usable url/format, skipped")
            }
            EntryOutcome::Failed(why) => write!(f, "failed: {}", why),
        }
    }
}
