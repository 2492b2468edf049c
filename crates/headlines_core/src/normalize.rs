use chrono::{DateTime, SecondsFormat};
use headlines_logging::headlines_warn;
use sha2::{Digest, Sha256};
use url::Url;

use crate::{CardKind, FeedItem, SearchResponse, SearchResultItem};

/// Prefix the search service puts in front of a feed address in its keys.
pub const FEED_RESOURCE_ID_PREFIX: &str = "feed/";

pub fn normalize_response(response: SearchResponse) -> Vec<SearchResultItem> {
    response.results.iter().map(normalize_feed_item).collect()
}

pub fn normalize_feed_item(item: &FeedItem) -> SearchResultItem {
    SearchResultItem {
        id: stable_id(&item.feed_id),
        title: item.title.clone(),
        description: item.description.clone(),
        category: item.description.clone(),
        icon_url: non_empty(&item.visual_url).or_else(|| non_empty(&item.icon_url)),
        image_url: non_empty(&item.cover_url).or_else(|| non_empty(&item.icon_url)),
        content_url: feed_url(&item.feed_id),
        date_created: item.last_updated.and_then(format_timestamp),
        subscribers: item.subscribers.unwrap_or(0),
        kind: CardKind::Headlines,
    }
}

/// First eight bytes of the key's SHA-256 digest, big-endian.
pub fn stable_id(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Extracts the feed address from a `feed/<url>` key.
///
/// Keys with another prefix have no address. A `feed/` key whose remainder
/// is not an http(s) URL is logged and treated the same way. Other schemes
/// that parse (`file:`, `content:`, `about:`) are rejected on purpose: a
/// feed address must be fetchable over the network.
pub fn feed_url(key: &str) -> Option<Url> {
    let address = key.strip_prefix(FEED_RESOURCE_ID_PREFIX)?;
    match Url::parse(address) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(_) | Err(_) => {
            headlines_warn!("Provided feed ID does not contain valid URL: {}", key);
            None
        }
    }
}

/// ISO-8601 date-time in UTC with millisecond precision.
pub fn format_timestamp(epoch_millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_owned)
}
