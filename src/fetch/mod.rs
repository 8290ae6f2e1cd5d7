//! Data providers for the static results dataset.
//!
//! The dataset is a tree of pre-scraped JSON files: an `index.json` mapping
//! years to event ids, and one `events/{year}/{event}.json` array per event.
//! Providers only retrieve and decode; failures propagate to the caller and
//! are never retried here.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::ingest::RawEntry;
use crate::store::EventKey;

/// Errors that can occur while retrieving the dataset.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Event not found: {0}")]
    EventNotFound(EventKey),
}

/// Year -> event id -> event label, as stored in `index.json`.
pub type EventIndex = BTreeMap<String, BTreeMap<String, String>>;

/// Source of the raw dataset.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// The event index: available years and their events.
    async fn event_index(&self) -> Result<EventIndex, ProviderError>;

    /// The raw entries for one event.
    async fn fetch_event(&self, key: &EventKey) -> Result<Vec<RawEntry>, ProviderError>;
}

/// Provider that fetches the dataset over HTTP from static hosting.
pub struct HttpDataProvider {
    client: Client,
    base_url: Url,
}

impl HttpDataProvider {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl DataProvider for HttpDataProvider {
    async fn event_index(&self) -> Result<EventIndex, ProviderError> {
        let url = self.url_for("index.json")?;
        debug!(%url, "fetching event index");

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn fetch_event(&self, key: &EventKey) -> Result<Vec<RawEntry>, ProviderError> {
        let url = self.url_for(&format!("events/{}/{}.json", key.year, key.event_id))?;
        info!(%url, "fetching event data");

        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::EventNotFound(key.clone()));
        }
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Provider that reads the dataset from a local directory, for offline use
/// and tests.
pub struct LocalDataProvider {
    data_dir: PathBuf,
}

impl LocalDataProvider {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[async_trait]
impl DataProvider for LocalDataProvider {
    async fn event_index(&self) -> Result<EventIndex, ProviderError> {
        let path = self.data_dir.join("index.json");
        debug!(path = %path.display(), "reading event index");

        let contents = tokio::fs::read(&path).await?;
        Ok(serde_json::from_slice(&contents)?)
    }

    async fn fetch_event(&self, key: &EventKey) -> Result<Vec<RawEntry>, ProviderError> {
        let path = self
            .data_dir
            .join("events")
            .join(key.year.to_string())
            .join(format!("{}.json", key.event_id));
        info!(path = %path.display(), "reading event data");

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProviderError::EventNotFound(key.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&contents)?)
    }
}
