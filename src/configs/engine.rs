use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval of the navigation/cache reconcile poll, in milliseconds.
    pub poll_interval_ms: u64,
    /// Completion-poll interval for legacy-transport captures, in milliseconds.
    pub legacy_poll_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            legacy_poll_ms: 50,
        }
    }
}
