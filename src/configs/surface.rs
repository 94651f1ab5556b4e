use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SurfaceConfig {
    /// How long a transient status flash stays up before the label reverts,
    /// in milliseconds.
    pub flash_duration_ms: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: 1500,
        }
    }
}
