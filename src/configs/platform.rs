use serde::{Deserialize, Serialize};

/// Host-platform addressing: which traffic is worth looking at and how a
/// playable URL is recognised inside it.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PlatformConfig {
    /// Hostname suffix a request must match before its path is considered.
    pub domain_suffix: String,
    /// Path prefix of the single-item detail endpoint.
    pub detail_path: String,
    /// Path prefixes of the list/feed endpoints.
    pub feed_paths: Vec<String>,
    /// Path token marking the platform's canonical direct-play URLs.
    pub play_marker: String,
    /// Prefix for the canonical external link built from a content ID.
    pub direct_link_prefix: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            domain_suffix: "douyin.com".to_string(),
            detail_path: "/aweme/v1/web/aweme/detail/".to_string(),
            feed_paths: vec![
                "/aweme/v1/web/tab/feed/".to_string(),
                "/aweme/v2/web/module/feed/".to_string(),
            ],
            play_marker: "/aweme/v1/play/?".to_string(),
            direct_link_prefix: "https://vrc.aryz.dpdns.org/douyin/".to_string(),
        }
    }
}
