use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_EXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)$").expect("valid image extension regex"));

/// Whether a URL looks renderable as an image. Video and document links are
/// treated as "no displayable image" instead of being attempted and failing.
pub fn is_likely_image(url: &str) -> bool {
    IMAGE_EXT_RE.is_match(url)
}

/// Turns a possibly-relative media reference into a fetchable URL.
///
/// Absolute URLs pass through untouched. `/media/...` paths are rewritten onto
/// the origin of the API base (any path prefix of the base is dropped). Other
/// relative paths join the base with exactly one separating slash. An
/// unparseable base degrades to returning the input as-is rather than failing
/// the caller.
pub fn resolve_media_url(media: Option<&str>, api_base: &str) -> Option<String> {
    let media = media?;
    if media.is_empty() {
        return None;
    }
    if media.starts_with("http://") || media.starts_with("https://") {
        return Some(media.to_string());
    }
    let base = match reqwest::Url::parse(api_base) {
        Ok(url) => url,
        Err(_) => return Some(media.to_string()),
    };
    if media.starts_with("/media/") {
        return Some(format!("{}{}", base.origin().ascii_serialization(), media));
    }
    Some(format!(
        "{}/{}",
        api_base.trim_end_matches('/'),
        media.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com";

    #[test]
    fn absolute_urls_pass_through() {
        for url in ["https://x/a.jpg", "http://cdn.example.com/pic.png?v=2"] {
            assert_eq!(resolve_media_url(Some(url), BASE).as_deref(), Some(url));
            assert_eq!(
                resolve_media_url(Some(url), "not a url").as_deref(),
                Some(url)
            );
        }
    }

    #[test]
    fn media_paths_resolve_against_base_origin() {
        assert_eq!(
            resolve_media_url(Some("/media/foo.png"), BASE).as_deref(),
            Some("https://api.example.com/media/foo.png")
        );
        // path prefix of the base is dropped for /media/ assets
        assert_eq!(
            resolve_media_url(Some("/media/foo.png"), "https://api.example.com/v1").as_deref(),
            Some("https://api.example.com/media/foo.png")
        );
    }

    #[test]
    fn relative_paths_join_with_exactly_one_slash() {
        for base in ["https://api.example.com", "https://api.example.com/"] {
            for path in ["thumbs/a.jpg", "/thumbs/a.jpg"] {
                assert_eq!(
                    resolve_media_url(Some(path), base).as_deref(),
                    Some("https://api.example.com/thumbs/a.jpg"),
                    "base {base:?} + path {path:?}"
                );
            }
        }
    }

    #[test]
    fn unparseable_base_returns_input_unchanged() {
        assert_eq!(
            resolve_media_url(Some("thumbs/a.jpg"), "::nope::").as_deref(),
            Some("thumbs/a.jpg")
        );
    }

    #[test]
    fn absent_media_resolves_to_none() {
        assert_eq!(resolve_media_url(None, BASE), None);
        assert_eq!(resolve_media_url(Some(""), BASE), None);
    }

    #[test]
    fn image_classification_is_extension_exhaustive() {
        for ext in ["jpg", "jpeg", "png", "webp", "gif"] {
            assert!(is_likely_image(&format!("x.{ext}")), ".{ext} should match");
            assert!(
                is_likely_image(&format!("x.{}", ext.to_uppercase())),
                ".{ext} should match uppercased"
            );
        }
        for url in ["x.mp4", "x.pdf", "x.doc", "x", ""] {
            assert!(!is_likely_image(url), "{url:?} should not classify as image");
        }
    }
}
