/// Prefetch bookkeeping
///
/// Remembers which tabs already had their first images requested so that
/// hovering a tab or switching next to it never issues the same batch twice.
use std::collections::HashSet;

use super::data::Collections;
use super::window::VisibilityWindow;

/// Which rendition of a record a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Display,
    LowRes,
}

/// One fire-and-forget network request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchRequest {
    pub collection: String,
    pub image_id: usize,
    pub url: String,
    pub variant: Variant,
}

#[derive(Debug, Clone)]
pub struct PrefetchTracker {
    done: HashSet<String>,
    low_res_width: u32,
    low_res_quality: u8,
}

impl PrefetchTracker {
    pub fn new(low_res_width: u32, low_res_quality: u8) -> Self {
        Self {
            done: HashSet::new(),
            low_res_width,
            low_res_quality,
        }
    }

    pub fn is_prefetched(&self, name: &str) -> bool {
        self.done.contains(name)
    }

    /// Requests for the first records of `name`, or nothing if the tab is
    /// unknown or was already prefetched
    pub fn prefetch(
        &mut self,
        name: &str,
        collections: &Collections,
        window: &VisibilityWindow,
    ) -> Vec<PrefetchRequest> {
        if self.done.contains(name) {
            return Vec::new();
        }
        let Some(collection) = collections.get(name) else {
            return Vec::new();
        };
        self.done.insert(name.to_string());

        let count = window.visible_or_initial(name, collection.len());
        let mut requests = Vec::with_capacity(count * 2);
        for record in &collection.images()[..count] {
            if record.display_url.is_empty() {
                continue;
            }
            requests.push(PrefetchRequest {
                collection: name.to_string(),
                image_id: record.id,
                url: record.display_url.clone(),
                variant: Variant::Display,
            });
            if let Some(url) = self.low_res(&record.display_url) {
                requests.push(PrefetchRequest {
                    collection: name.to_string(),
                    image_id: record.id,
                    url,
                    variant: Variant::LowRes,
                });
            }
        }

        log::debug!("🛰️  Prefetching {} requests for {}", requests.len(), name);
        requests
    }

    /// Low resolution rendition of `url` with this tracker's width and quality
    pub fn low_res(&self, url: &str) -> Option<String> {
        low_res_url(url, self.low_res_width, self.low_res_quality)
    }

    /// Forget everything (used when the collections are reloaded)
    pub fn reset(&mut self) {
        self.done.clear();
    }
}

/// Low resolution rendition of an HTTP image URL, via width/quality query parameters.
/// Local paths have no such rendition.
pub fn low_res_url(url: &str, width: u32, quality: u8) -> Option<String> {
    let mut parsed = reqwest::Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed
        .query_pairs_mut()
        .append_pair("w", &width.to_string())
        .append_pair("q", &quality.to_string());
    Some(parsed.to_string())
}
