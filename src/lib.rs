//! BIND Statistics Collector
//!
//! Polls the statistics channel of a BIND name server, flattens the XML
//! status document into a fixed set of JSON sections and prints the result
//! for a metrics agent such as Telegraf's `exec` input.
//!
//! # Features
//!
//! * Version 3 statistics channel support
//! * Server, resolver, socket and zone maintenance counters
//! * Per-view counters and cache record-set counts
//! * Short-lived on-disk cache so frequent polls don't hit the server
//!
//! # Architecture
//!
//! Everything lives in the `stats` module:
//! * `stats::client` - fetches the status document over HTTP
//! * `stats::normalizer` - maps the XML document onto a `MetricSnapshot`
//! * `stats::cache` - freshness decisions and cache file persistence
//! * `stats::collector` - ties the pieces together for one invocation

/// Statistics collection, normalization and caching
pub mod stats;
