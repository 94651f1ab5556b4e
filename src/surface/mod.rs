pub mod actions;
pub mod clipboard;

pub use actions::*;
pub use clipboard::*;
