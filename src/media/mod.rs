mod extract;
mod link;
mod source;
mod types;

pub use link::{find_link, normalize_link};
pub use source::{HttpPageSource, PageSource};
pub use types::{MediaKind, MediaRecord};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs share links through redirect resolution, page fetch and extraction.
pub struct MediaResolver {
    source: Arc<dyn PageSource>,
}

impl MediaResolver {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        info!("Media resolver initialized with {} page source", source.name());
        Self { source }
    }

    async fn fetch(&self, link: &str) -> Result<String> {
        let target = self
            .source
            .resolve_redirect(link)
            .await
            .context("Failed to resolve share link")?;
        debug!("Fetching {} (from {})", target, link);

        let page = self
            .source
            .fetch_page(&target)
            .await
            .context("Failed to fetch share page")?;
        debug!("Fetched {} bytes from {}", page.len(), target);
        Ok(page)
    }

    /// Watermark-free video URL only; errors when the page has no video.
    pub async fn video_url(&self, link: &str) -> Result<String> {
        let page = self.fetch(link).await?;
        extract::extract_video_url(&page)
            .ok_or_else(|| anyhow::anyhow!("No video id found in page for {}", link))
    }

    pub async fn record(&self, link: &str) -> Result<MediaRecord> {
        let page = self.fetch(link).await?;
        let record = extract::extract_record(&page);
        let kind = match record.kind {
            MediaKind::Video => "video",
            MediaKind::ImageGallery => "image gallery",
        };
        info!("Extracted {} record {} for {}", kind, record.aweme_id, link);
        Ok(record)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PageSource;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory page source keyed by URL.
    #[derive(Default)]
    pub struct StubSource {
        pub redirects: HashMap<String, String>,
        pub pages: HashMap<String, String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub fn redirect(mut self, from: &str, to: &str) -> Self {
            self.redirects.insert(from.to_string(), to.to_string());
            self
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl PageSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn resolve_redirect(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string()))
        }

        async fn fetch_page(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Failed to fetch page: HTTP 404 Not Found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubSource;
    use super::*;

    const SHORT: &str = "https://v.douyin.com/abc123/";
    const LONG: &str = "https://www.iesdouyin.com/share/video/7412345678901234567/";

    fn resolver(source: StubSource) -> MediaResolver {
        MediaResolver::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_video_url_follows_redirect() {
        let source = StubSource::default()
            .redirect(SHORT, LONG)
            .page(LONG, r#"{"video":{"play_addr":{"uri":"xyz"}}}"#);
        let url = resolver(source).video_url(SHORT).await.unwrap();
        assert_eq!(
            url,
            "https://www.iesdouyin.com/aweme/v1/play/?video_id=xyz&ratio=1080p&line=0"
        );
    }

    #[tokio::test]
    async fn test_video_url_without_redirect() {
        let source = StubSource::default().page(LONG, r#""video":{"play_addr":{"uri":"abc"}"#);
        let url = resolver(source).video_url(LONG).await.unwrap();
        assert!(url.contains("video_id=abc&"));
    }

    #[tokio::test]
    async fn test_video_url_fails_for_gallery() {
        let source = StubSource::default().page(LONG, r#"{"images":[]}"#);
        let err = resolver(source).video_url(LONG).await.unwrap_err();
        assert!(err.to_string().contains("No video id"));
    }

    #[tokio::test]
    async fn test_fetch_error_is_propagated() {
        let err = resolver(StubSource::default())
            .record(SHORT)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch share page");
        assert!(format!("{:#}", err).contains("404"));
    }

    #[tokio::test]
    async fn test_record_for_gallery() {
        let page = r#"{"uri":"img1","url_list":["https://p3-sign.douyinpic.com/img1.jpeg"]},"statistics":{"digg_count":5},"nickname":"me""#;
        let source = StubSource::default().redirect(SHORT, LONG).page(LONG, page);
        let record = resolver(source).record(SHORT).await.unwrap();
        assert_eq!(record.kind, MediaKind::ImageGallery);
        assert_eq!(record.image_url_list, vec!["https://p3-sign.douyinpic.com/img1.jpeg"]);
        assert_eq!(record.digg_count, 5);
        assert_eq!(record.nickname, "me");
    }

    #[tokio::test]
    async fn test_resolves_then_fetches_target() {
        let source = Arc::new(
            StubSource::default()
                .redirect(SHORT, LONG)
                .page(LONG, r#""video":{"play_addr":{"uri":"q1"}"#),
        );
        let resolver = MediaResolver::new(source.clone());
        resolver.video_url(SHORT).await.unwrap();
        assert_eq!(*source.requests.lock().unwrap(), vec![SHORT, LONG]);
    }
}
