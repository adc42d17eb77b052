//! BIND Statistics Collection
//!
//! This module turns the BIND statistics channel into a flat JSON document:
//! * `client` - HTTP fetch of the XML status document
//! * `document` - parsed XML tree and version detection
//! * `normalizer` - version specific extraction rules
//! * `snapshot` - the normalized `MetricSnapshot`
//! * `decoder` - restores integer typing before output
//! * `cache` - freshness checks and the cache file
//! * `collector` - one complete collection cycle
//! * `context` - collector configuration

/// Snapshot cache file and freshness checks
pub mod cache;

/// Statistics channel HTTP client
pub mod client;

/// End-to-end collection cycle
pub mod collector;

/// Collector configuration
pub mod context;

/// Integer restoring JSON decoder
pub mod decoder;

/// Parsed status document
pub mod document;

/// Error types for statistics collection
pub mod errors;

/// Version specific XML to JSON rules
pub mod normalizer;

/// Normalized metric snapshot
pub mod snapshot;

pub use collector::{Collection, Source, StatsCollector};
pub use context::CollectorConfig;
pub use errors::{Result, StatsError};
pub use snapshot::MetricSnapshot;
