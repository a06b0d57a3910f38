/// In-memory image cache
///
/// Decoded handles keyed by URL, shared by the grid and the lightbox.
/// URLs in flight are tracked so a photo is never fetched twice at once.
use std::collections::{HashMap, HashSet};

use iced::widget::image::Handle;

#[derive(Debug, Clone)]
pub struct CachedImage {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<String, CachedImage>,
    pending: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&CachedImage> {
        self.images.get(url)
    }

    /// Mark `url` as in flight. Returns false if it is cached or already pending.
    pub fn begin(&mut self, url: &str) -> bool {
        if url.is_empty() || self.images.contains_key(url) || self.pending.contains(url) {
            return false;
        }
        self.pending.insert(url.to_string());
        true
    }

    /// The display image, or its low resolution variant while the former loads
    pub fn best(&self, display_url: &str, low_res_url: Option<&str>) -> Option<&CachedImage> {
        self.images
            .get(display_url)
            .or_else(|| low_res_url.and_then(|url| self.images.get(url)))
    }

    /// Store a fetched image. Results nobody is waiting for (fetches started
    /// before a `clear`) are dropped.
    pub fn insert(&mut self, url: String, bytes: Vec<u8>, width: u32, height: u32) {
        if !self.pending.remove(&url) {
            log::debug!("🗑️  Dropping stale image {}", url);
            return;
        }
        let handle = Handle::from_bytes(bytes);
        self.images.insert(url, CachedImage { handle, width, height });
    }

    /// A fetch finished without an image; it may be retried later
    pub fn fail(&mut self, url: &str) {
        self.pending.remove(url);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Drop every handle and forget fetches in flight
    pub fn clear(&mut self) {
        self.images.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_dedupes() {
        let mut cache = ImageCache::new();
        assert!(cache.begin("https://cdn.example.com/a.jpg"));
        assert!(!cache.begin("https://cdn.example.com/a.jpg"));
        assert!(!cache.begin(""));

        cache.fail("https://cdn.example.com/a.jpg");
        assert!(cache.begin("https://cdn.example.com/a.jpg"));

        cache.insert("https://cdn.example.com/a.jpg".to_string(), vec![0u8; 4], 1, 1);
        assert!(!cache.begin("https://cdn.example.com/a.jpg"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("https://cdn.example.com/a.jpg").map(|c| c.width), Some(1));
    }

    #[test]
    fn test_clear_leaves_no_stale_entries() {
        let mut cache = ImageCache::new();
        assert!(cache.begin("https://cdn.example.com/a.jpg"));
        cache.insert("https://cdn.example.com/a.jpg".to_string(), vec![0u8; 4], 1, 1);
        assert!(cache.begin("https://cdn.example.com/b.jpg"));

        cache.clear();
        assert_eq!(cache.len(), 0);

        // b.jpg was in flight during the reload
        cache.insert("https://cdn.example.com/b.jpg".to_string(), vec![0u8; 4], 1, 1);
        assert_eq!(cache.len(), 0);
        assert!(cache.begin("https://cdn.example.com/b.jpg"));
    }

    #[test]
    fn test_best_falls_back_to_low_res() {
        let mut cache = ImageCache::new();
        let display = "https://cdn.example.com/a.jpg";
        let low_res = "https://cdn.example.com/a.jpg?w=256&q=50";
        assert!(cache.best(display, Some(low_res)).is_none());

        cache.begin(low_res);
        cache.insert(low_res.to_string(), vec![0u8; 4], 256, 171);
        assert_eq!(cache.best(display, Some(low_res)).map(|c| c.width), Some(256));
        assert!(cache.best(display, None).is_none());

        cache.begin(display);
        cache.insert(display.to_string(), vec![0u8; 4], 1200, 800);
        assert_eq!(cache.best(display, Some(low_res)).map(|c| c.width), Some(1200));
    }
}
