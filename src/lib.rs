//! Concurrent block-list downloader.
//!
//! Validates a declared list of sources, fetches each one, extracts domains
//! with a per-format pattern, and writes one file per source. Entries that
//! produce nothing get one more pass before being reported as failed.

pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod source;
pub mod stats;
