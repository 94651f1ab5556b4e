pub mod classify;
pub mod legacy;
pub mod transport;

pub use classify::*;
pub use legacy::*;
pub use transport::*;
