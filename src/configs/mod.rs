pub mod base;
pub mod engine;
pub mod logging;
pub mod platform;
pub mod surface;

pub use base::*;
pub use engine::*;
pub use logging::*;
pub use platform::*;
pub use surface::*;
