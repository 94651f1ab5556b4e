//! Codec/container preference policy.
//!
//! mp4/H264 is the variant third-party players handle best, so compatibility
//! outranks quality: next-gen and proprietary codecs are excluded even when
//! their bitrate would otherwise win.

use std::cmp::Reverse;

use crate::metadata::{BitrateVariant, UrlListContainer, VideoMetadata};

/// Picks one URL out of a container: the first one carrying the platform's
/// canonical direct-play marker, else the first non-empty entry.
pub fn pick_preferred_url<'a>(container: &'a UrlListContainer, marker: &str) -> Option<&'a str> {
    let mut first = None;
    for url in container.url_list.iter().filter(|u| !u.is_empty()) {
        if url.contains(marker) {
            return Some(url);
        }
        if first.is_none() {
            first = Some(url.as_str());
        }
    }
    first
}

fn is_compatible(variant: &BitrateVariant) -> bool {
    variant.format.as_deref() == Some("mp4")
        && variant.is_h265 != Some(1)
        && variant.is_bytevc1 != Some(1)
}

/// Selects the single best playable URL for one item.
///
/// Candidate containers, first non-empty wins:
/// 1. the dedicated H264 container;
/// 2. compatible bitrate variants, highest bitrate first (missing bitrate
///    counts as 0, ties keep payload order);
/// 3. the generic fallback container.
pub fn pick_best_url(video: &VideoMetadata, marker: &str) -> Option<String> {
    let mut containers: Vec<&UrlListContainer> = Vec::new();

    if let Some(h264) = &video.play_addr_h264 {
        containers.push(h264);
    }

    let mut variants: Vec<&BitrateVariant> = video
        .bit_rate
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|v| is_compatible(v))
        .collect();
    variants.sort_by_key(|v| Reverse(v.bit_rate.unwrap_or(0)));

    for variant in variants {
        if let Some(addr) = &variant.play_addr {
            containers.push(addr);
        }
    }

    if let Some(fallback) = &video.play_addr {
        containers.push(fallback);
    }

    containers
        .into_iter()
        .find_map(|container| pick_preferred_url(container, marker).map(str::to_owned))
}
