//! Regex extraction over the raw markup
//!
//! Catches image URLs serialized anywhere in the page: JSON fields inside
//! inline scripts, carousel arrays, and bare CDN links.

use regex::Regex;

use super::{push_unique, unescape_url};

/// Image URLs found by literal patterns, deduplicated in first-seen order.
pub fn extract_pattern_images(html: &str, signature: &str) -> Vec<String> {
    let sig = regex::escape(signature);
    let mut images = Vec::new();

    // Quoted JSON field values
    let field_patterns = [
        r#""display_url"\s*:\s*"([^"]+)""#.to_string(),
        format!(r#""src"\s*:\s*"([^"]*{sig}[^"]*\.jpg[^"]*)""#),
        format!(r#""url"\s*:\s*"([^"]*{sig}[^"]*\.jpg[^"]*)""#),
    ];
    for pattern in &field_patterns {
        collect_captures(html, pattern, signature, &mut images);
    }

    // display_url values nested in carousel arrays
    let container_patterns = [
        r#"(?s)"carousel_media"\s*:\s*\[(.*?)\]"#,
        r#"(?s)"edge_sidecar_to_children"\s*:\s*\{[^}]*"edges"\s*:\s*\[(.*?)\]"#,
    ];
    if let Ok(display_url) = Regex::new(r#""display_url"\s*:\s*"([^"]+)""#) {
        for pattern in container_patterns {
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            for cap in re.captures_iter(html) {
                if let Some(span) = cap.get(1) {
                    for inner in display_url.captures_iter(span.as_str()) {
                        if let Some(m) = inner.get(1) {
                            keep(m.as_str(), signature, &mut images);
                        }
                    }
                }
            }
        }
    }

    // Bare CDN links anywhere in the text
    for ext in ["jpg", "jpeg", "png"] {
        let pattern = format!(r#"https://[^"'<>\s]*{sig}[^"'<>\s]*\.{ext}[^"'<>\s]*"#);
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        for m in re.find_iter(html) {
            keep(m.as_str(), signature, &mut images);
        }
    }

    images
}

fn collect_captures(html: &str, pattern: &str, signature: &str, images: &mut Vec<String>) {
    let Ok(re) = Regex::new(pattern) else {
        return;
    };
    for cap in re.captures_iter(html) {
        if let Some(m) = cap.get(1) {
            keep(m.as_str(), signature, images);
        }
    }
}

fn keep(raw: &str, signature: &str, images: &mut Vec<String>) {
    let url = unescape_url(raw);
    if url.contains(signature) {
        push_unique(images, url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: &str = "scontent";

    #[test]
    fn test_display_url_field() {
        let html = r#"<script>{"display_url":"https:\/\/scontent-lax3-1.cdninstagram.com\/v\/a.jpg?stp=1\u0026_nc_ht=x"}</script>"#;
        let images = extract_pattern_images(html, SIG);
        assert_eq!(
            images,
            vec!["https://scontent-lax3-1.cdninstagram.com/v/a.jpg?stp=1&_nc_ht=x"]
        );
    }

    #[test]
    fn test_src_and_url_fields_need_signature_and_jpg() {
        let html = r#"
            {"src": "https://scontent.x/b.jpg"}
            {"src": "https://static.cdn.x/logo.jpg"}
            {"url": "https://scontent.x/c.jpg?w=1080"}
            {"url": "https://scontent.x/page"}
        "#;
        let images = extract_pattern_images(html, SIG);
        assert_eq!(
            images,
            vec!["https://scontent.x/b.jpg", "https://scontent.x/c.jpg?w=1080"]
        );
    }

    #[test]
    fn test_carousel_media_array() {
        let html = r#""carousel_media": [{"display_url" : "https://scontent.x/1.jpg"}, {"display_url":"https://scontent.x/2.jpg"}]"#;
        let images = extract_pattern_images(html, SIG);
        assert!(images.contains(&"https://scontent.x/1.jpg".to_string()));
        assert!(images.contains(&"https://scontent.x/2.jpg".to_string()));
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_bare_links() {
        let html = r#"<img src='https://scontent.x/p.png'> see https://scontent.x/q.jpeg and https://example.com/r.jpg"#;
        let images = extract_pattern_images(html, SIG);
        assert_eq!(
            images,
            vec!["https://scontent.x/q.jpeg", "https://scontent.x/p.png"]
        );
    }

    #[test]
    fn test_display_url_without_signature_dropped() {
        let html = r#"{"display_url":"https://other-cdn.net/a.jpg"}"#;
        assert!(extract_pattern_images(html, SIG).is_empty());
    }

    #[test]
    fn test_duplicates_within_strategy() {
        let html = r#"{"display_url":"https://scontent.x/a.jpg"} {"display_url":"https://scontent.x/a.jpg"}"#;
        assert_eq!(
            extract_pattern_images(html, SIG),
            vec!["https://scontent.x/a.jpg"]
        );
    }
}
