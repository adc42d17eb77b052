//! client for the BIND statistics channel

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::stats::context::CollectorConfig;
use crate::stats::errors::{FetchError, Result};

/// Source of raw status documents
pub trait StatusFetcher {
    /// Returns the body of the status document
    fn fetch(&self) -> Result<String>;
}

/// Fetches `http://host:port/` with a blocking reqwest client
pub struct HttpStatusFetcher {
    client: Client,
    url: String,
}

impl HttpStatusFetcher {
    pub fn new(url: String, timeout: Duration) -> Result<HttpStatusFetcher> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(FetchError::from)?;

        Ok(HttpStatusFetcher { client, url })
    }

    pub fn from_config(config: &CollectorConfig) -> Result<HttpStatusFetcher> {
        HttpStatusFetcher::new(config.status_url(), config.timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatusFetcher for HttpStatusFetcher {
    fn fetch(&self) -> Result<String> {
        log::debug!("GET {}", self.url);

        let response = self.client.get(&self.url).send().map_err(FetchError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Body(e.to_string()))?;

        log::debug!("Received {} bytes from {}", body.len(), self.url);

        Ok(body)
    }
}

impl<T: StatusFetcher + ?Sized> StatusFetcher for Box<T> {
    fn fetch(&self) -> Result<String> {
        (**self).fetch()
    }
}
