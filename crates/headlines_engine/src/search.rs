use std::time::Duration;

use futures_util::StreamExt;
use headlines_core::SearchResponse;
use headlines_logging::headlines_debug;
use tokio::sync::mpsc;
use url::Url;

use crate::types::SearchEvent;
use crate::{SearchError, SearchFailureKind};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://cloud.feedly.com".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Receives result batches in the order a search produces them.
pub trait BatchSink: Send + Sync {
    fn emit(&self, batch: SearchResponse);
}

pub(crate) struct ChannelBatchSink {
    tx: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelBatchSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SearchEvent>) -> Self {
        Self { tx }
    }
}

impl BatchSink for ChannelBatchSink {
    fn emit(&self, batch: SearchResponse) {
        let _ = self.tx.send(SearchEvent::Batch(batch));
    }
}

/// Remote feed search.
///
/// An implementation may emit any number of batches before returning;
/// `Ok` marks normal completion.
#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    async fn search_feeds(
        &self,
        query: &str,
        limit: u32,
        sink: &dyn BatchSink,
    ) -> Result<(), SearchError>;
}

/// Feed search against the aggregator's `/v3/search/feeds` endpoint.
#[derive(Debug, Clone)]
pub struct FeedlySearchService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl FeedlySearchService {
    pub fn new(settings: ServiceSettings) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SearchError::new(SearchFailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn search_url(&self, query: &str, limit: u32) -> Result<Url, SearchError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/v3/search/feeds"))
            .map_err(|err| SearchError::new(SearchFailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("count", &limit.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SearchService for FeedlySearchService {
    async fn search_feeds(
        &self,
        query: &str,
        limit: u32,
        sink: &dyn BatchSink,
    ) -> Result<(), SearchError> {
        let url = self.search_url(query, limit)?;
        headlines_debug!("Searching feeds: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                SearchFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }

        let batch: SearchResponse = serde_json::from_slice(&body)
            .map_err(|err| SearchError::new(SearchFailureKind::Decode, err.to_string()))?;
        headlines_debug!(
            "Search for [{}] returned {} result(s)",
            query,
            batch.results.len()
        );
        sink.emit(batch);
        Ok(())
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SearchError {
    SearchError::new(
        SearchFailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(SearchFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return SearchError::new(SearchFailureKind::Decode, err.to_string());
    }
    SearchError::new(SearchFailureKind::Network, err.to_string())
}
