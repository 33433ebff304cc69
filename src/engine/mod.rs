pub mod extractor;
mod fetcher;
mod orchestrator;
mod processor;
mod retry;
mod traits;
mod types;
pub mod writer;

pub use extractor::{extract, extract_domains};
pub use fetcher::HttpFetcher;
pub use orchestrator::{Orchestrator, PassOutcome};
pub use processor::SourceProcessor;
pub use retry::{PassKind, RetryCoordinator};
pub use traits::Fetcher;
pub use types::{EntryOutcome, FetchOutcome, RetryReason, SkipReason};
