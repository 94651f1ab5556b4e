use url::Url;

use crate::configs::PlatformConfig;

/// Which kind of metadata endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Single-item detail endpoint.
    Detail,
    /// List/feed endpoint carrying many items.
    Feed,
}

#[derive(Debug, Clone)]
pub struct Classified {
    pub kind: EndpointKind,
    pub url: Url,
}

/// Classifies a request address: hostname suffix match against the platform
/// domain, then path-prefix match against the known metadata endpoints.
/// Anything else is `None` and costs nothing beyond this check.
pub fn classify(raw_url: &str, platform: &PlatformConfig) -> Option<Classified> {
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str()?;
    if !host_matches(host, &platform.domain_suffix) {
        return None;
    }

    let path = url.path();
    if path.starts_with(&platform.detail_path) {
        return Some(Classified {
            kind: EndpointKind::Detail,
            url,
        });
    }
    if platform
        .feed_paths
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return Some(Classified {
            kind: EndpointKind::Feed,
            url,
        });
    }
    None
}

fn host_matches(host: &str, suffix: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == suffix || host.ends_with(&format!(".{}", suffix))
}
