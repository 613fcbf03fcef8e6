//! The JSON result printed for every invocation.
//!
//! Optional fields are omitted rather than serialized as `null`.

use serde::{Deserialize, Serialize};

pub const NO_IMAGES_ERROR: &str = "No images found in the post";
pub const QUALITY: &str = "High Resolution";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Carousel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaData {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MediaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Build the result for a sorted, validated image list.
pub fn build_result(images: Vec<String>, title: &str) -> ExtractionResult {
    let Some(first) = images.first().cloned() else {
        return ExtractionResult::failure(NO_IMAGES_ERROR);
    };

    let (kind, images) = if images.len() > 1 {
        (MediaKind::Carousel, Some(images))
    } else {
        (MediaKind::Image, None)
    };

    ExtractionResult {
        success: true,
        data: Some(MediaData {
            kind,
            url: first.clone(),
            thumbnail: first,
            title: title.to_string(),
            quality: QUALITY.to_string(),
            images,
        }),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_image_has_no_images_field() {
        let result = build_result(vec!["https://scontent.x/a.jpg".to_string()], "Post");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {
                    "type": "image",
                    "url": "https://scontent.x/a.jpg",
                    "thumbnail": "https://scontent.x/a.jpg",
                    "title": "Post",
                    "quality": "High Resolution"
                }
            })
        );
    }

    #[test]
    fn test_carousel() {
        let images = vec![
            "https://scontent.x/a.jpg".to_string(),
            "https://scontent.x/b.jpg".to_string(),
        ];
        let result = build_result(images.clone(), "Post");
        let data = result.data.unwrap();

        assert_eq!(data.kind, MediaKind::Carousel);
        assert_eq!(data.url, images[0]);
        assert_eq!(data.thumbnail, images[0]);
        assert_eq!(data.images, Some(images));
    }

    #[test]
    fn test_empty_is_failure() {
        let result = build_result(Vec::new(), "Post");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({"success": false, "error": "No images found in the post"})
        );
    }

    #[test]
    fn test_kind_matches_cardinality() {
        for n in 0..5 {
            let images: Vec<String> = (0..n).map(|i| format!("https://scontent.x/{i}.jpg")).collect();
            let result = build_result(images, "t");
            match result.data {
                Some(data) => {
                    assert_eq!(data.kind == MediaKind::Carousel, n > 1);
                    assert_eq!(data.images.is_some(), n > 1);
                }
                None => assert_eq!(n, 0),
            }
        }
    }
}
