//! Error types for statistics collection

use std::collections::BTreeMap;
use std::io;

use derive_more::{Display, Error, From};

/// Failures talking to the statistics channel
#[derive(Debug, Display, From, Error)]
pub enum FetchError {
    /// Connection refused, timed out, or any other transport failure
    #[display(fmt = "request failed: {}", _0)]
    Transport(reqwest::Error),
    /// The server answered with something other than 200
    #[display(fmt = "HTTP GET {} failed with status {}", url, status)]
    #[from(ignore)]
    HttpStatus {
        url: String,
        status: u16,
    },
    /// The response body could not be read or was not valid UTF-8
    #[display(fmt = "unable to read response body: {}", _0)]
    #[from(ignore)]
    Body(#[error(not(source))] String),
}

/// Failures reading or writing the cache file
#[derive(Debug, Display, From, Error)]
pub enum CacheError {
    #[display(fmt = "cache file I/O failed: {}", _0)]
    Io(io::Error),
    #[display(fmt = "cache file is not valid JSON: {}", _0)]
    Serialization(serde_json::Error),
    #[display(fmt = "cache file does not hold a metrics object")]
    Corrupt,
}

/// Top level error for one collection cycle
#[derive(Debug, Display, From, Error)]
pub enum StatsError {
    #[display(fmt = "fetch error: {}", _0)]
    Fetch(FetchError),
    /// Detected statistics version has no normalization rule
    #[display(fmt = "Not supported version: {} {:?}", version, attributes)]
    #[from(ignore)]
    UnsupportedVersion {
        version: String,
        attributes: BTreeMap<String, String>,
    },
    /// Document failed to parse or lacks something a rule requires
    #[display(fmt = "malformed status document: {}", _0)]
    #[from(ignore)]
    MalformedDocument(#[error(not(source))] String),
    #[display(fmt = "cache error: {}", _0)]
    Cache(CacheError),
}

impl From<roxmltree::Error> for StatsError {
    fn from(err: roxmltree::Error) -> Self {
        StatsError::MalformedDocument(err.to_string())
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Fetch(FetchError::Transport(err))
    }
}

/// Result type alias for statistics operations
pub type Result<T> = std::result::Result<T, StatsError>;
