use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "img")]
    ImageGallery,
}

/// Everything extracted from one resolved share link.
///
/// Exactly one of `video_url` / `image_url_list` is filled, depending on `kind`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct MediaRecord {
    pub aweme_id: String,
    pub comment_count: u64,
    pub digg_count: u64,
    pub share_count: u64,
    pub collect_count: u64,
    pub nickname: String,
    pub signature: String,
    pub desc: String,
    pub create_time: String,
    pub video_url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub image_url_list: Vec<String>,
}
