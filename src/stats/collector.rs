//! One collection cycle: serve the cache or refresh it
//!
//! The value handed back is always what the cache file holds after the
//! cycle, decoded through `decoder::coerce_integers`. On a refresh the new
//! snapshot is decoded directly instead of being read back from disk; the
//! result is the same.

use std::time::SystemTime;

use serde_json::Value;

use crate::stats::cache::{write_atomic, CacheGate, CacheState};
use crate::stats::client::{HttpStatusFetcher, StatusFetcher};
use crate::stats::context::CollectorConfig;
use crate::stats::decoder;
use crate::stats::errors::Result;
use crate::stats::normalizer;

/// Where the emitted metrics came from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Cache,
    Refreshed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    pub source: Source,
    pub metrics: Value,
}

pub struct StatsCollector {
    gate: CacheGate,
    fetcher: Box<dyn StatusFetcher>,
    force_refresh: bool,
}

impl StatsCollector {
    pub fn new(config: &CollectorConfig, fetcher: Box<dyn StatusFetcher>) -> StatsCollector {
        StatsCollector {
            gate: CacheGate::new(config.cache_file.clone(), config.cache_lifetime),
            fetcher,
            force_refresh: false,
        }
    }

    /// Collector talking to the statistics channel described by `config`
    pub fn with_http(config: &CollectorConfig) -> Result<StatsCollector> {
        let fetcher = HttpStatusFetcher::from_config(config)?;
        Ok(StatsCollector::new(config, Box::new(fetcher)))
    }

    /// Ignore a fresh cache file and always fetch
    pub fn force_refresh(mut self, force: bool) -> StatsCollector {
        self.force_refresh = force;
        self
    }

    pub fn gate(&self) -> &CacheGate {
        &self.gate
    }

    pub fn collect(&self) -> Result<Collection> {
        self.collect_at(SystemTime::now())
    }

    pub fn collect_at(&self, now: SystemTime) -> Result<Collection> {
        let state = self.gate.inspect(now)?;

        if let CacheState::Fresh { age } = state {
            if !self.force_refresh {
                log::debug!(
                    "Serving {} ({}s old)",
                    self.gate.path().display(),
                    age.as_secs()
                );
                return Ok(Collection {
                    source: Source::Cache,
                    metrics: self.gate.read()?,
                });
            }
        }

        log::info!(
            "Refreshing {} (cache {:?})",
            self.gate.path().display(),
            state
        );

        let snapshot = self.gate.refresh(
            || self.fetcher.fetch(),
            normalizer::normalize_str,
            write_atomic,
        )?;

        Ok(Collection {
            source: Source::Refreshed,
            metrics: decoder::coerce_integers(&snapshot.to_value()),
        })
    }
}
