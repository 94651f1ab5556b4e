//! Wire-format models for the platform's metadata endpoints.
//!
//! Everything is `Option`-shaped: the platform omits fields freely and a
//! missing field must never sink the surrounding payload.

use serde::Deserialize;
use serde_json::Value;

/// Ordered mirrors of one logical stream. Order is platform-assigned and is
/// a hint, not a quality ranking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlListContainer {
    #[serde(default)]
    pub url_list: Vec<String>,
}

/// One encoding of the content. Lives only inside a single API payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BitrateVariant {
    pub format: Option<String>,
    pub bit_rate: Option<u64>,
    pub is_h265: Option<u8>,
    pub is_bytevc1: Option<u8>,
    pub play_addr: Option<UrlListContainer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMetadata {
    pub play_addr_h264: Option<UrlListContainer>,
    pub play_addr: Option<UrlListContainer>,
    pub bit_rate: Option<Vec<BitrateVariant>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailResponse {
    pub aweme_detail: Option<DetailItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailItem {
    pub aweme_id: Option<String>,
    pub video: Option<VideoMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedItem {
    pub aweme_id: Option<String>,
    pub video: Option<VideoMetadata>,
}

/// Decodes the items of a feed payload one by one, dropping the ones that do
/// not fit the expected shape so a malformed entry cannot abort its siblings.
pub fn feed_items(payload: &Value) -> Vec<FeedItem> {
    payload
        .get("aweme_list")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
