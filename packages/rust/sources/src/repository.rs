//! Content repository — the single entry point the rendering layer depends on.
//!
//! The repository owns the HTTP client, dispatches to the adapter matching
//! the configured backend kind, and propagates adapter results and errors
//! unchanged. One outbound request per collection per call; no caching.
//! Transient network failures are retried with bounded exponential backoff.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use pagesmith_shared::{
    BackendConfig, FetchConfig, Page, PagesmithError, Post, Result, TeamMember,
};

use crate::adapters::{AdapterRegistry, BackendAdapter, Collection};

/// User-Agent string for backend requests.
const USER_AGENT: &str = concat!("pagesmith/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Bounded exponential backoff for backend fetches.
///
/// Only retryable errors (transport failures, non-2xx statuses) are retried;
/// a malformed payload is failed immediately since a shape mismatch will not
/// heal on retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry attempts after the initial request.
    pub max_attempts: u32,
    /// First backoff delay.
    pub initial_delay: Duration,
    /// Backoff delay ceiling.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Disable retries entirely (single attempt).
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(fetch: &FetchConfig) -> Self {
        Self {
            max_attempts: fetch.max_attempts,
            initial_delay: Duration::from_millis(fetch.initial_delay_ms),
            max_delay: Duration::from_millis(fetch.max_delay_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// ContentRepository
// ---------------------------------------------------------------------------

/// Fetches collections from the configured backend and returns normalized
/// records, decoupling the rendering layer from which backend is configured.
pub struct ContentRepository {
    client: Client,
    registry: AdapterRegistry,
    retry: RetryPolicy,
}

impl ContentRepository {
    /// Create a repository with the given fetch configuration.
    pub fn new(fetch: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()
            .map_err(|e| PagesmithError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            registry: AdapterRegistry::new(),
            retry: RetryPolicy::from(fetch),
        })
    }

    /// Override the retry policy (single-attempt fetches in tests).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch and normalize the page collection.
    pub async fn list_pages(&self, config: &BackendConfig) -> Result<Vec<Page>> {
        let adapter = self.registry.select(&config.kind)?;
        let body = self
            .fetch_collection(adapter, config, Collection::Pages)
            .await?;
        adapter.parse_pages(&body)
    }

    /// Fetch and normalize the post collection.
    pub async fn list_posts(&self, config: &BackendConfig) -> Result<Vec<Post>> {
        let adapter = self.registry.select(&config.kind)?;
        let body = self
            .fetch_collection(adapter, config, Collection::Posts)
            .await?;
        adapter.parse_posts(&body)
    }

    /// Fetch and normalize the team collection.
    pub async fn list_team(&self, config: &BackendConfig) -> Result<Vec<TeamMember>> {
        let adapter = self.registry.select(&config.kind)?;
        let body = self
            .fetch_collection(adapter, config, Collection::Team)
            .await?;
        adapter.parse_team(&body)
    }

    /// Issue one GET for a collection, retrying retryable failures.
    #[instrument(skip_all, fields(kind = %config.kind, collection = %collection))]
    async fn fetch_collection(
        &self,
        adapter: &dyn BackendAdapter,
        config: &BackendConfig,
        collection: Collection,
    ) -> Result<String> {
        let url = adapter.collection_url(&config.base_url, collection, config.preview)?;
        debug!(%url, "fetching collection");

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry.initial_delay)
            .with_max_delay(self.retry.max_delay)
            .with_max_times(self.retry.max_attempts as usize);

        (|| async { fetch_once(&self.client, &url).await })
            .retry(backoff)
            .when(|e: &PagesmithError| e.is_retryable())
            .await
    }
}

/// Perform a single GET and return the response body.
async fn fetch_once(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| PagesmithError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PagesmithError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| PagesmithError::Network(format!("{url}: failed to read body: {e}")))
}
