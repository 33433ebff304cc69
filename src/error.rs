//! Error types for the fetch pipeline.

use std::path::PathBuf;

/// A source document that cannot be accepted. Aborts the run before any download.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entry #{position} ({name}): expected keys {expected:?}, found {found:?}")]
    InvalidKeys {
        position: usize,
        name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("entry #{position} ({name}): field `{field}` has the wrong type")]
    InvalidField {
        position: usize,
        name: String,
        field: &'static str,
    },

    #[error("entry #{position} ({name}): invalid url {url}")]
    InvalidUrl {
        position: usize,
        name: String,
        url: String,
    },

    #[error("entry #{position} ({name}): blocklist already exists {url}")]
    DuplicateUrl {
        position: usize,
        name: String,
        url: String,
    },

    #[error("entry #{position} ({name}): unsupported file format {format}")]
    UnsupportedFormat {
        position: usize,
        name: String,
        format: String,
    },

    #[error("entry #{position} ({name}): {urls} urls but {formats} formats")]
    FormatCountMismatch {
        position: usize,
        name: String,
        urls: usize,
        formats: usize,
    },

    #[error("entry #{position} ({name}): missing group")]
    MissingGroup { position: usize, name: String },

    #[error("entry #{position} ({name}): `{field}` value {value:?} is not a single directory name")]
    UnsafePath {
        position: usize,
        name: String,
        field: &'static str,
        value: String,
    },

    #[error("entry #{position}: not a JSON object")]
    NotAnObject { position: usize },
}

/// Why a single GET did not produce a body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("http status {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out")]
    Timeout,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Retrying cannot help: the request itself could not be built.
    pub fn is_permanent(&self) -> bool {
        matches!(self, FetchError::InvalidRequest(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no `conf` list")]
    MissingConf { path: PathBuf },
}
