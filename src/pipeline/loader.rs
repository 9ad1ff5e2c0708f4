//! The asynchronous edge of the pipeline: fetching a dataset's raw bytes and
//! handing the normalized result to the presentation layer.
//!
//! Loads may overlap (a user switching tabs quickly), but only the most
//! recently *issued* load may publish. Every load takes a token from a
//! monotonically increasing counter; when its normalization finishes it
//! publishes only if no newer token has been issued in the meantime.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Category, RecordSet};
use crate::error::{HazardError, Result};
use crate::observability::metrics;
use crate::pipeline::orchestrator::Pipeline;

/// Where raw dataset bytes come from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, category: Category) -> Result<Vec<u8>>;
}

/// Reads `{root}/{category}_data.csv` from disk
pub struct FsDatasetSource {
    root: PathBuf,
}

impl FsDatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.root.join(category.data_file_name())
    }
}

#[async_trait]
impl DatasetSource for FsDatasetSource {
    async fn fetch(&self, category: Category) -> Result<Vec<u8>> {
        let path = self.path_for(category);
        debug!("reading dataset from {}", path.display());
        tokio::fs::read(&path).await.map_err(|e| HazardError::Fetch {
            category: category.to_string(),
            message: format!("{}: {}", path.display(), e),
        })
    }
}

/// Fetches `{base_url}/{category}_data.csv` over HTTP
pub struct HttpDatasetSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDatasetSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn url_for(&self, category: Category) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            category.data_file_name()
        )
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self, category: Category) -> Result<Vec<u8>> {
        let url = self.url_for(category);
        debug!("fetching dataset from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HazardError::Fetch {
                category: category.to_string(),
                message: format!("GET {} returned {}", url, status),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// What happened to a load request
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The result was handed to the presentation layer
    Applied(Arc<RecordSet>),
    /// A newer load was issued while this one ran; its result was dropped
    Stale { token: u64 },
    /// The category name was not recognized; nothing was fetched
    Rejected,
}

impl LoadOutcome {
    pub fn applied(&self) -> Option<&Arc<RecordSet>> {
        match self {
            LoadOutcome::Applied(set) => Some(set),
            _ => None,
        }
    }
}

/// Fetches, normalizes and publishes datasets with last-write-wins ordering
pub struct DatasetLoader {
    source: Arc<dyn DatasetSource>,
    pipeline: Arc<Pipeline>,
    issued: AtomicU64,
    current: Mutex<Option<Arc<RecordSet>>>,
}

impl DatasetLoader {
    pub fn new(source: Arc<dyn DatasetSource>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            source,
            pipeline,
            issued: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Last published record set, if any
    pub fn current(&self) -> Option<Arc<RecordSet>> {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Load a category by name. Fetch and parse failures publish an empty
    /// set; they are never returned as errors.
    #[instrument(skip(self))]
    pub async fn load(&self, category: &str) -> LoadOutcome {
        let category = match category.parse::<Category>() {
            Ok(c) => c,
            Err(e) => {
                warn!("{}; load ignored", e);
                metrics::normalize::unknown_category();
                return LoadOutcome::Rejected;
            }
        };

        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "load issued");

        let set = match self.source.fetch(category).await {
            Ok(bytes) => self.pipeline.normalize_text_for(&bytes, category),
            Err(e) => {
                error!(category = category.as_str(), "dataset load failed: {}", e);
                metrics::loader::fetch_error(category.as_str());
                RecordSet::empty(category)
            }
        };

        self.publish(token, set)
    }

    fn publish(&self, token: u64, set: RecordSet) -> LoadOutcome {
        let label = set.category.as_str();
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Checked under the lock so a concurrent publish cannot interleave.
        let newest = self.issued.load(Ordering::SeqCst);
        if token != newest {
            info!(token, newest, category = label, "discarding superseded load");
            metrics::loader::stale(label);
            return LoadOutcome::Stale { token };
        }

        let set = Arc::new(set);
        *guard = Some(Arc::clone(&set));
        metrics::loader::published(label);
        LoadOutcome::Applied(set)
    }
}
