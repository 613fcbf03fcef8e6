//! JSON-LD image extraction
//!
//! Reads `<script type="application/ld+json">` blocks. Each block is decoded
//! on its own so one malformed block never hides images in another.
//! Supports `image` fields and `@graph` arrays of `ImageObject`s.

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::push_unique;

/// Raw text of every JSON-LD block in the markup
pub fn jsonld_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}

/// Image URLs from the JSON-LD blocks of `html`.
pub fn extract_jsonld_images(html: &str, signature: &str) -> Vec<String> {
    jsonld_images_from_blocks(&jsonld_blocks(html), signature)
}

/// Image URLs from already captured JSON-LD block texts.
pub fn jsonld_images_from_blocks<S: AsRef<str>>(blocks: &[S], signature: &str) -> Vec<String> {
    let mut images = Vec::new();

    for block in blocks {
        let trimmed = block.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => process_jsonld_value(&json, signature, &mut images),
            Err(e) => debug!(error = %e, "skipping malformed JSON-LD block"),
        }
    }

    images
}

fn process_jsonld_value(value: &Value, signature: &str, images: &mut Vec<String>) {
    match value {
        // Array of JSON-LD documents
        Value::Array(arr) => {
            for item in arr {
                process_jsonld_value(item, signature, images);
            }
        }
        Value::Object(obj) => {
            match obj.get("image") {
                Some(Value::Array(list)) => {
                    for img in list.iter().filter_map(Value::as_str) {
                        if img.contains(signature) {
                            push_unique(images, img.to_string());
                        }
                    }
                }
                Some(Value::String(img)) if img.contains(signature) => {
                    push_unique(images, img.clone());
                }
                _ => {}
            }

            if let Some(Value::Array(graph)) = obj.get("@graph") {
                for item in graph.iter().filter(|item| is_image_object(item)) {
                    if let Some(url) = item.get("contentUrl").and_then(Value::as_str) {
                        push_unique(images, url.to_string());
                    }
                }
            }
        }
        _ => {}
    }
}

fn is_image_object(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(t)) => t == "ImageObject",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("ImageObject")),
        _ => false,
    }
}
