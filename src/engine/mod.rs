pub mod cache;
pub mod context;
pub mod sync;

pub use cache::ResolutionCache;
pub use context::{CurrentView, EngineContext};
pub use sync::Synchronizer;
