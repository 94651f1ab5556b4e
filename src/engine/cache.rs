use dashmap::DashMap;

use crate::common::types::ContentId;

/// Page-lifetime map from content ID to its resolved playable URL.
///
/// Last write wins; entries are never evicted. Growth is bounded by how many
/// distinct items flow past during one session, which is accepted.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<ContentId, String>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ContentId) -> Option<String> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    pub fn set(&self, id: ContentId, url: String) {
        self.entries.insert(id, url);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable-ordered copy of the entries, for reporting.
    pub fn snapshot(&self) -> Vec<(ContentId, String)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
