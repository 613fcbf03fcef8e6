//! OpenGraph and meta tag extraction
//!
//! Image URLs from `og:image` (and any other meta tag pointing at the CDN),
//! plus the post title from `og:title`.

use regex::Regex;
use scraper::{Html, Selector};

use super::push_unique;

/// Image URLs from meta tags, `og:image` first, deduplicated in first-seen order.
pub fn extract_meta_images(html: &str, signature: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("meta[content]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut images = Vec::new();

    for element in document.select(&selector) {
        if element.value().attr("property") != Some("og:image") {
            continue;
        }
        if let Some(content) = element.value().attr("content") {
            if content.contains(signature) {
                push_unique(&mut images, content.to_string());
            }
        }
    }

    // Other variants (og:image:secure_url, twitter:image, ...) that point at the CDN
    let pattern = format!(r"{}.*\.jpg", regex::escape(signature));
    if let Ok(image_content) = Regex::new(&pattern) {
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                if image_content.is_match(content) {
                    push_unique(&mut images, content.to_string());
                }
            }
        }
    }

    images
}

/// Content of the first non-empty `og:title` meta tag
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from)
}
