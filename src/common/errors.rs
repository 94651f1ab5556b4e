use thiserror::Error;

/// Failures the interception pipeline can surface to a caller.
///
/// Classification misses and cache misses are ordinary `None` outcomes, not
/// errors; everything here is recoverable and never aborts the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A response body that classified as platform metadata failed to parse.
    #[error("response body is not valid platform metadata: {0}")]
    Parse(#[from] serde_json::Error),

    /// The underlying transport failed before a response was produced.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}
