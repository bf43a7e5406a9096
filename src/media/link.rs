use regex::Regex;
use std::sync::LazyLock;

static DOUYIN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((https?://)?([a-zA-Z0-9-]+\.)*douyin\.com[^\s]*)").unwrap()
});

/// Returns the first douyin link found in free text, verbatim.
pub fn find_link(text: &str) -> Option<&str> {
    DOUYIN_LINK.find(text).map(|m| m.as_str())
}

/// Like [`find_link`], but guarantees a scheme so the result can be fetched.
/// Used for links pasted into a request path, where browsers often drop `//`.
pub fn normalize_link(text: &str) -> Option<String> {
    let link = find_link(text)?;
    if link.starts_with("http") {
        Some(link.to_string())
    } else {
        Some(format!("https://{}", link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_link_in_share_text() {
        let text = "7.43 复制打开抖音，看看【某人的作品】 https://v.douyin.com/iRNBho6u/ a@b.com 08/26";
        assert_eq!(find_link(text), Some("https://v.douyin.com/iRNBho6u/"));
    }

    #[test]
    fn test_find_link_preserves_scheme() {
        assert_eq!(
            find_link("check out http://www.douyin.com/video/123?x=1 now"),
            Some("http://www.douyin.com/video/123?x=1")
        );
    }

    #[test]
    fn test_find_link_takes_leftmost() {
        let text = "https://v.douyin.com/first/ https://v.douyin.com/second/";
        assert_eq!(find_link(text), Some("https://v.douyin.com/first/"));
    }

    #[test]
    fn test_find_link_without_scheme() {
        assert_eq!(find_link("v.douyin.com/abc123/"), Some("v.douyin.com/abc123/"));
        assert_eq!(find_link("www.douyin.com/video/1"), Some("www.douyin.com/video/1"));
    }

    #[test]
    fn test_find_link_not_found() {
        assert_eq!(find_link(""), None);
        assert_eq!(find_link("https://www.tiktok.com/@user/video/1"), None);
        assert_eq!(find_link("douyin dot com"), None);
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(
            normalize_link("/v.douyin.com/abc123/").as_deref(),
            Some("https://v.douyin.com/abc123/")
        );
        assert_eq!(
            normalize_link("/https://v.douyin.com/abc123/").as_deref(),
            Some("https://v.douyin.com/abc123/")
        );
        assert_eq!(
            normalize_link("/http://v.douyin.com/abc123/").as_deref(),
            Some("http://v.douyin.com/abc123/")
        );
        assert_eq!(normalize_link("/index.html"), None);
    }

    #[test]
    fn test_normalize_collapsed_scheme() {
        // "https:/" is not a scheme match, so the host portion is taken and re-prefixed
        assert_eq!(
            normalize_link("/https:/v.douyin.com/abc123/").as_deref(),
            Some("https://v.douyin.com/abc123/")
        );
    }
}
