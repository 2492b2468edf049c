use serde::Deserialize;
use url::Url;

/// One feed entry as returned by the feed search service.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedItem {
    /// Unique key, e.g. `feed/https://example.com/rss`.
    pub feed_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub visual_url: Option<String>,
    pub icon_url: Option<String>,
    pub cover_url: Option<String>,
    /// Epoch milliseconds.
    pub last_updated: Option<i64>,
    pub subscribers: Option<u64>,
    pub velocity: Option<f64>,
    pub language: Option<String>,
}

/// One batch of results from the feed search service.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub results: Vec<FeedItem>,
    pub hint: Option<String>,
    pub related: Vec<String>,
}

/// Card layout a result is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardKind {
    #[default]
    Headlines,
    SingleLineText,
    Icon,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Derived from the source key; equal keys give equal ids.
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon_url: Option<String>,
    pub image_url: Option<String>,
    /// Feed address encoded in the source key, when it has one.
    pub content_url: Option<Url>,
    pub date_created: Option<String>,
    pub subscribers: u64,
    pub kind: CardKind,
}
