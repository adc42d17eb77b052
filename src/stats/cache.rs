//! Snapshot Cache File
//!
//! A single JSON file holding the most recent `MetricSnapshot`. Telegraf may
//! poll far more often than the statistics are worth refreshing, so within
//! the freshness window the file is served as-is and the name server is left
//! alone.
//!
//! # Behaviour
//!
//! * Fresh means the file exists and is at most `max_age` old (inclusive)
//! * A refresh overwrites the whole file, never merges into it
//! * Writes go to a sibling temporary file that is renamed into place, so a
//!   failed or interrupted refresh leaves the previous contents untouched
//!
//! There is no locking between processes. Two invocations racing past the
//! freshness check will both fetch and both write; the last rename wins and
//! either result is a complete snapshot.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde_json::Value;

use crate::stats::decoder;
use crate::stats::errors::{CacheError, Result};
use crate::stats::snapshot::MetricSnapshot;

/// What the cache file looked like at a given instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheState {
    Missing,
    Fresh { age: Duration },
    Stale { age: Duration },
}

/// Freshness test: the file exists and `now - mtime <= max_age`
///
/// A modification time in the future counts as age zero.
pub fn is_fresh(now: SystemTime, cache_mtime: Option<SystemTime>, max_age: Duration) -> bool {
    match cache_mtime {
        Some(mtime) => age_at(now, mtime) <= max_age,
        None => false,
    }
}

fn age_at(now: SystemTime, mtime: SystemTime) -> Duration {
    now.duration_since(mtime).unwrap_or_default()
}

/// Decides between serving the cache file and refreshing it
#[derive(Clone, Debug)]
pub struct CacheGate {
    path: PathBuf,
    max_age: Duration,
}

impl CacheGate {
    pub fn new<P: Into<PathBuf>>(path: P, max_age: Duration) -> CacheGate {
        CacheGate {
            path: path.into(),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Modification time of the cache file, `None` if it doesn't exist
    pub fn modified(&self) -> Result<Option<SystemTime>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.modified().map_err(CacheError::from)?)),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::from(e).into()),
        }
    }

    pub fn inspect(&self, now: SystemTime) -> Result<CacheState> {
        let state = match self.modified()? {
            None => CacheState::Missing,
            Some(mtime) => {
                let age = age_at(now, mtime);
                if is_fresh(now, Some(mtime), self.max_age) {
                    CacheState::Fresh { age }
                } else {
                    CacheState::Stale { age }
                }
            }
        };

        Ok(state)
    }

    pub fn is_fresh(&self, now: SystemTime) -> Result<bool> {
        Ok(is_fresh(now, self.modified()?, self.max_age))
    }

    /// Reads the cache file and restores integer typing
    ///
    /// Anything other than a JSON object is treated as corrupt.
    pub fn read(&self) -> Result<Value> {
        let text = fs::read_to_string(&self.path).map_err(CacheError::from)?;
        let value = decoder::decode_str(&text)?;
        if !value.is_object() {
            return Err(CacheError::Corrupt.into());
        }

        Ok(value)
    }

    /// Replaces the cache file with `snapshot`
    pub fn store(&self, snapshot: &MetricSnapshot) -> Result<()> {
        write_atomic(&self.path, snapshot)
    }

    /// Fetches, normalizes and persists a new snapshot
    ///
    /// A fetch or normalize failure is returned unchanged and `write` is
    /// never called, so the existing cache file survives.
    pub fn refresh<F, N, W>(&self, fetch: F, normalize: N, write: W) -> Result<MetricSnapshot>
    where
        F: FnOnce() -> Result<String>,
        N: FnOnce(&str) -> Result<MetricSnapshot>,
        W: FnOnce(&Path, &MetricSnapshot) -> Result<()>,
    {
        let body = fetch()?;
        let snapshot = normalize(&body)?;
        write(&self.path, &snapshot)?;

        log::debug!("Cache file {} refreshed", self.path.display());

        Ok(snapshot)
    }
}

/// Serializes `snapshot` next to `path` and renames it over `path`
pub fn write_atomic(path: &Path, snapshot: &MetricSnapshot) -> Result<()> {
    let data = serde_json::to_vec(snapshot).map_err(CacheError::from)?;
    let tmp_path = temp_path(path);

    let written = fs::File::create(&tmp_path)
        .and_then(|mut file| file.write_all(&data).and_then(|_| file.sync_all()))
        .and_then(|_| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(CacheError::from(e).into());
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
