//! Media attachment classification.

use serde_json::Value;
use tracing::trace;

use xport_shared::MediaItem;

use crate::accessor::{self, Path, json_path};

/// Attachment blocks, highest priority first. `extended_entities` carries
/// every attachment; `entities` only the first.
const ATTACHMENT_BLOCKS: &[Path] = &[
    json_path!("extended_entities", "media"),
    json_path!("entities", "media"),
];

/// URL fields for photos and video thumbnails, high resolution first.
const IMAGE_URLS: &[Path] = &[json_path!("media_url_https"), json_path!("media_url")];

const VARIANTS: Path = json_path!("video_info", "variants");

/// Supported upstream media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    /// Videos and animated GIFs.
    Video,
}

impl MediaKind {
    /// Map the upstream `type` string. Unknown types are `None`.
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "photo" => Some(Self::Photo),
            "video" | "animated_gif" => Some(Self::Video),
            _ => None,
        }
    }
}

/// The attachment list of a tweet's `legacy` block.
///
/// Only one block is ever used: the first that resolves to an array, even
/// an empty one.
pub fn attachments(legacy: &Value) -> &[Value] {
    ATTACHMENT_BLOCKS
        .iter()
        .find_map(|block| accessor::array_at(legacy, block))
        .unwrap_or(&[])
}

/// Normalize one attachment, or `None` for unsupported types.
pub fn classify(attachment: &Value) -> Option<MediaItem> {
    let kind = accessor::str_at(attachment, json_path!("type"));
    let Some(kind) = kind.and_then(MediaKind::from_type) else {
        trace!(kind = ?kind, "skipping unsupported media type");
        return None;
    };

    let image_url = image_url(attachment);
    Some(match kind {
        MediaKind::Photo => MediaItem::Photo { url: image_url },
        MediaKind::Video => MediaItem::Video {
            thumbnail: image_url,
            variants: accessor::array_or_empty(attachment, VARIANTS)
                .iter()
                .filter_map(|variant| accessor::str_at(variant, json_path!("url")))
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect(),
        },
    })
}

/// Normalize every supported attachment of a `legacy` block, in source order.
pub fn classify_all(legacy: &Value) -> Vec<MediaItem> {
    attachments(legacy).iter().filter_map(classify).collect()
}

fn image_url(attachment: &Value) -> Option<String> {
    IMAGE_URLS
        .iter()
        .filter_map(|field| accessor::str_at(attachment, field))
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn photo_prefers_https_url() {
        let item = classify(&json!({
            "type": "photo",
            "media_url": "http://pbs.twimg.com/media/a.jpg",
            "media_url_https": "https://pbs.twimg.com/media/a.jpg"
        }));
        assert_eq!(
            item,
            Some(MediaItem::Photo {
                url: Some("https://pbs.twimg.com/media/a.jpg".into())
            })
        );
    }

    #[test]
    fn photo_falls_back_to_plain_url() {
        let item = classify(&json!({ "type": "photo", "media_url": "http://x/a.jpg" }));
        assert_eq!(
            item,
            Some(MediaItem::Photo {
                url: Some("http://x/a.jpg".into())
            })
        );
    }

    #[test]
    fn video_variants_keep_source_order() {
        let item = classify(&json!({
            "type": "video",
            "media_url_https": "https://thumb",
            "video_info": { "variants": [
                { "bitrate": 2176000, "url": "v1" },
                { "content_type": "application/x-mpegURL" },
                { "bitrate": 832000, "url": "v2" }
            ] }
        }));
        assert_eq!(
            item,
            Some(MediaItem::Video {
                thumbnail: Some("https://thumb".into()),
                variants: vec!["v1".into(), "v2".into()],
            })
        );
    }

    #[test]
    fn animated_gif_is_a_video() {
        let item = classify(&json!({
            "type": "animated_gif",
            "video_info": { "variants": [{ "url": "g1" }] }
        }));
        assert_eq!(
            item,
            Some(MediaItem::Video {
                thumbnail: None,
                variants: vec!["g1".into()],
            })
        );
    }

    #[test]
    fn unknown_types_are_dropped() {
        assert_eq!(classify(&json!({ "type": "audio_space" })), None);
        assert_eq!(classify(&json!({ "media_url_https": "https://x" })), None);
    }

    #[test]
    fn extended_entities_win_over_entities() {
        let legacy = json!({
            "extended_entities": { "media": [
                { "type": "photo", "media_url_https": "ext-1" },
                { "type": "photo", "media_url_https": "ext-2" }
            ] },
            "entities": { "media": [
                { "type": "photo", "media_url_https": "plain-1" }
            ] }
        });
        let media = classify_all(&legacy);
        assert_eq!(
            media,
            vec![
                MediaItem::Photo { url: Some("ext-1".into()) },
                MediaItem::Photo { url: Some("ext-2".into()) },
            ]
        );
    }

    #[test]
    fn entities_used_when_extended_missing() {
        let legacy = json!({
            "entities": { "media": [{ "type": "photo", "media_url_https": "plain-1" }] }
        });
        assert_eq!(
            classify_all(&legacy),
            vec![MediaItem::Photo { url: Some("plain-1".into()) }]
        );
    }

    #[test]
    fn empty_extended_entities_shadow_entities() {
        let legacy = json!({
            "extended_entities": { "media": [] },
            "entities": { "media": [{ "type": "photo", "media_url_https": "plain-1" }] }
        });
        assert!(attachments(&legacy).is_empty());
        assert!(classify_all(&legacy).is_empty());
    }

    #[test]
    fn non_array_extended_entities_fall_back() {
        let legacy = json!({
            "extended_entities": { "media": null },
            "entities": { "media": [{ "type": "photo", "media_url_https": "plain-1" }] }
        });
        assert_eq!(
            classify_all(&legacy),
            vec![MediaItem::Photo { url: Some("plain-1".into()) }]
        );
    }

    #[test]
    fn no_media_blocks_yield_nothing() {
        assert!(classify_all(&json!({})).is_empty());
        assert!(classify_all(&json!({ "entities": { "urls": [] } })).is_empty());
    }
}
