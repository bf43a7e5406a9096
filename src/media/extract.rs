use super::types::{MediaKind, MediaRecord};
use crate::utils::{format_timestamp, unescape_json_fragment};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const PLAY_URL_TEMPLATE: &str = "https://www.iesdouyin.com/aweme/v1/play/?video_id={}&ratio=1080p&line=0";

/// Marker of proxied thumbnail variants inside gallery url lists.
const THUMBNAIL_MARKER: &str = "/obj/";

/// Compiled once and shared read-only by every request.
struct Patterns {
    video_id: Regex,
    statistics: Regex,
    aweme_id: Regex,
    comment_count: Regex,
    digg_count: Regex,
    share_count: Regex,
    collect_count: Regex,
    nickname: Regex,
    signature: Regex,
    desc: Regex,
    create_time: Regex,
    image_url: Regex,
    image_uri: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    video_id: Regex::new(r#""video":\{"play_addr":\{"uri":"([a-z0-9]+)""#).unwrap(),
    statistics: Regex::new(r#""statistics"\s*:\s*\{([\s\S]*?)\},"#).unwrap(),
    aweme_id: Regex::new(r#""aweme_id"\s*:\s*"([^"]+)""#).unwrap(),
    comment_count: Regex::new(r#""comment_count"\s*:\s*(\d+)"#).unwrap(),
    digg_count: Regex::new(r#""digg_count"\s*:\s*(\d+)"#).unwrap(),
    share_count: Regex::new(r#""share_count"\s*:\s*(\d+)"#).unwrap(),
    collect_count: Regex::new(r#""collect_count"\s*:\s*(\d+)"#).unwrap(),
    nickname: Regex::new(r#""nickname"\s*:\s*"([^"]+)""#).unwrap(),
    signature: Regex::new(r#""signature"\s*:\s*"([^"]+)""#).unwrap(),
    desc: Regex::new(r#""desc":\s*"([^"]+)""#).unwrap(),
    create_time: Regex::new(r#""create_time":\s*(\d+)"#).unwrap(),
    image_url: Regex::new(
        r#"\{"uri":"[^\s"]+","url_list":\["(https://p\d{1,2}-sign\.douyinpic\.com/.*?)""#,
    )
    .unwrap(),
    image_uri: Regex::new(r#""uri":"([^\s"]+)","url_list":"#).unwrap(),
});

fn capture<'a>(text: &'a str, re: &Regex) -> Option<&'a str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn capture_string(text: &str, re: &Regex) -> String {
    capture(text, re).unwrap_or_default().to_string()
}

/// Counters are digit runs; values past `i64::MAX` saturate to it.
fn capture_count(text: &str, re: &Regex) -> u64 {
    capture(text, re)
        .map(|v| v.parse::<i64>().unwrap_or(i64::MAX) as u64)
        .unwrap_or(0)
}

pub fn play_url(video_id: &str) -> String {
    PLAY_URL_TEMPLATE.replace("{}", video_id)
}

/// Watermark-free playback URL, if the page embeds a video play address.
pub fn extract_video_url(page: &str) -> Option<String> {
    capture(page, &PATTERNS.video_id).map(play_url)
}

/// Builds a [`MediaRecord`] from a fetched share page. Fields that do not
/// match are left at their defaults.
pub fn extract_record(page: &str) -> MediaRecord {
    let p = &*PATTERNS;
    let mut record = MediaRecord::default();

    match extract_video_url(page) {
        Some(url) => {
            record.kind = MediaKind::Video;
            record.video_url = url;
        }
        None => {
            record.kind = MediaKind::ImageGallery;
            record.image_url_list = extract_image_urls(page);
        }
    }

    // Counters share names with unrelated objects on the page, so only the
    // first statistics block is searched.
    if let Some(stats) = p.statistics.find(page) {
        let stats = stats.as_str();
        record.aweme_id = capture_string(stats, &p.aweme_id);
        record.comment_count = capture_count(stats, &p.comment_count);
        record.digg_count = capture_count(stats, &p.digg_count);
        record.share_count = capture_count(stats, &p.share_count);
        record.collect_count = capture_count(stats, &p.collect_count);
    }

    record.nickname = unescape_json_fragment(&capture_string(page, &p.nickname));
    record.signature = unescape_json_fragment(&capture_string(page, &p.signature));
    record.desc = unescape_json_fragment(&capture_string(page, &p.desc));

    let create_time = capture(page, &p.create_time)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    record.create_time = format_timestamp(create_time);

    record
}

/// Collects signed gallery image URLs in page order.
///
/// A URL is kept when it contains one of the image uris seen on the page, is
/// not a thumbnail variant and was not already collected. Pairing is by
/// substring, so an uri that is a prefix of another one matches both images.
pub fn extract_image_urls(page: &str) -> Vec<String> {
    let p = &*PATTERNS;
    let content = page.replace(r"\u002F", "/");

    let uris: HashSet<&str> = p
        .image_uri
        .captures_iter(&content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for url in p
        .image_url
        .captures_iter(&content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
    {
        if url.contains(THUMBNAIL_MARKER) || seen.contains(url) {
            continue;
        }
        if uris.iter().any(|uri| url.contains(uri)) {
            seen.insert(url);
            urls.push(url.to_string());
        }
    }

    urls
}
