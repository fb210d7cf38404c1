//! Rules for recognising direct media links

use std::collections::HashSet;

/// Whether a yt-dlp format entry points at a playable file or HLS playlist
pub fn is_format_media(url: &str, ext: Option<&str>) -> bool {
    url.ends_with(".mp4") || url.contains(".m3u8") || matches!(ext, Some("mp4" | "m3u8"))
}

/// Whether a URL requested by a page looks like video traffic
pub fn is_request_media(url: &str) -> bool {
    url.ends_with(".mp4") || url.contains(".m3u8") || url.contains("videoplayback")
}

/// Drop repeated entries, keeping the first occurrence of each
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
