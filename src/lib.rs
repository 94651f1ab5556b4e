//! Passive traffic-interception and URL-resolution engine behind the Douyin
//! quick-copy helper: observes the host's metadata traffic, ranks playable
//! URLs by codec compatibility and caches them per content ID so a later
//! copy action needs no request of its own.

pub mod common;
pub mod configs;
pub mod engine;
pub mod identity;
pub mod intercept;
pub mod metadata;
pub mod ranker;
pub mod surface;
