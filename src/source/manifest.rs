/// JSON manifest source
///
/// The manifest mirrors a headless CMS export: an ordered list of
/// collections, each with items carrying a full size `media` block and a
/// web sized `webMedia` block. Missing fields never fail the load.
use serde::Deserialize;

use crate::error::{GalleryError, Result};
use crate::state::data::{Collection, Collections, ImageRecord};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    collections: Vec<ManifestCollection>,
}

#[derive(Debug, Deserialize)]
struct ManifestCollection {
    name: String,
    #[serde(default)]
    items: Vec<ManifestItem>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestItem {
    #[serde(default)]
    media: Option<Media>,
    #[serde(default, rename = "webMedia")]
    web_media: Option<Media>,
}

#[derive(Debug, Default, Deserialize)]
struct Media {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Parse a manifest document
pub fn parse(json: &str, origin: &str) -> Result<Collections> {
    let manifest: Manifest = serde_json::from_str(json)?;
    if manifest.collections.is_empty() {
        return Err(GalleryError::EmptySource(origin.to_string()));
    }

    let collections = manifest
        .collections
        .into_iter()
        .map(|c| Collection::new(c.name, map_items(c.items)))
        .collect();

    Collections::new(collections)
}

/// Missing fields become empty strings or `None`. An item without a web
/// rendition is displayed from its full resolution URL rather than left blank.
fn map_items(items: Vec<ManifestItem>) -> Vec<ImageRecord> {
    items
        .into_iter()
        .enumerate()
        .map(|(id, item)| {
            let media = item.media.unwrap_or_default();
            let web = item.web_media.unwrap_or_default();
            let source_url = media.url.unwrap_or_default();
            let display_url = web.url.filter(|u| !u.is_empty()).unwrap_or_else(|| source_url.clone());

            ImageRecord {
                id,
                source_url,
                display_url,
                alt_text: media.alt.or(web.alt).unwrap_or_default(),
                width: media.width.or(web.width),
                height: media.height.or(web.height),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "collections": [
            {
                "name": "Opening Party",
                "items": [
                    {
                        "_title": "Welcome",
                        "media": { "url": "https://assets.example.com/full/1.jpg", "alt": "Crowd", "width": 6000, "height": 4000 },
                        "webMedia": { "url": "https://assets.example.com/web/1.jpg" }
                    },
                    { "media": { "url": "https://assets.example.com/full/2.jpg" } },
                    { "_title": "broken" }
                ]
            },
            { "name": "Day 1", "items": [] }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let collections = parse(MANIFEST, "test").unwrap();
        assert_eq!(collections.names().collect::<Vec<_>>(), vec!["Opening Party", "Day 1"]);

        let party = collections.get("Opening Party").unwrap();
        assert_eq!(party.len(), 3);

        let first = party.get(0).unwrap();
        assert_eq!(first.display_url, "https://assets.example.com/web/1.jpg");
        assert_eq!(first.alt_text, "Crowd");
        assert_eq!(first.aspect_ratio(), Some(1.5));

        let second = party.get(1).unwrap();
        assert_eq!(second.id, 1);
        assert_eq!(second.display_url, second.source_url);
        assert_eq!(second.alt_text, "");

        let broken = party.get(2).unwrap();
        assert_eq!(broken.source_url, "");
        assert_eq!(broken.display_url, "");
    }

    #[test]
    fn test_empty_manifest() {
        assert!(matches!(parse("{}", "empty.json"), Err(GalleryError::EmptySource(_))));
        assert!(matches!(parse("[", "bad.json"), Err(GalleryError::Json(_))));
    }

    #[test]
    fn test_duplicate_tabs() {
        let json = r#"{ "collections": [ { "name": "Day 1" }, { "name": "Day 1" } ] }"#;
        assert!(matches!(parse(json, "dup.json"), Err(GalleryError::DuplicateCollection(_))));
    }
}
