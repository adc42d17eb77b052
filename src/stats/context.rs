//! Collector configuration shared by the fetcher and the cache gate

use std::path::PathBuf;
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8053;
pub const DEFAULT_CACHE_FILE: &str = "/tmp/telegraf_bind.cache";
pub const DEFAULT_CACHE_LIFETIME_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Where to find the statistics channel and how long its output stays cached
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Statistics channel host
    pub host: String,
    /// Statistics channel port
    pub port: u16,
    /// Cache file holding the last normalized snapshot
    pub cache_file: PathBuf,
    /// Maximum cache age before a refresh is required
    #[serde(with = "seconds")]
    pub cache_lifetime: Duration,
    /// Network timeout for the status request
    #[serde(with = "seconds")]
    pub timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            cache_lifetime: Duration::from_secs(DEFAULT_CACHE_LIFETIME_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CollectorConfig {
    /// URL of the status document; the path is always `/`
    pub fn status_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
