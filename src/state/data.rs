/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the data source layer and the UI layer. They are built once
/// per load and never mutated afterwards.
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

/// Represents a single photo in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Position of the record inside its collection
    pub id: usize,
    /// Full resolution URL (used for downloads)
    pub source_url: String,
    /// Web-sized URL shown in the grid and lightbox
    pub display_url: String,
    /// Alternative text (empty when the source had none)
    pub alt_text: String,
    /// True pixel width, when known
    pub width: Option<u32>,
    /// True pixel height, when known
    pub height: Option<u32>,
}

impl ImageRecord {
    /// Width divided by height, if both dimensions are known and non-zero
    pub fn aspect_ratio(&self) -> Option<f32> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(w as f32 / h as f32),
            _ => None,
        }
    }
}

/// A named, ordered list of records. One collection is one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    images: Vec<ImageRecord>,
}

impl Collection {
    pub fn new(name: impl Into<String>, images: Vec<ImageRecord>) -> Self {
        Self {
            name: name.into(),
            images,
        }
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ImageRecord> {
        self.images.get(position)
    }
}

/// All collections of one load, in tab order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collections {
    collections: Vec<Collection>,
}

impl Collections {
    /// Build the store, rejecting duplicate collection names
    pub fn new(collections: Vec<Collection>) -> Result<Self> {
        for (i, collection) in collections.iter().enumerate() {
            if collections[..i].iter().any(|c| c.name == collection.name) {
                return Err(GalleryError::DuplicateCollection(collection.name.clone()));
            }
        }
        Ok(Self { collections })
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Length of a collection, 0 for unknown names
    pub fn len_of(&self, name: &str) -> usize {
        self.get(name).map_or(0, Collection::len)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }

    pub fn first_name(&self) -> Option<&str> {
        self.collections.first().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn total_images(&self) -> usize {
        self.collections.iter().map(Collection::len).sum()
    }

    /// The tabs directly before and after `name`
    pub fn neighbors(&self, name: &str) -> (Option<&str>, Option<&str>) {
        let Some(index) = self.collections.iter().position(|c| c.name == name) else {
            return (None, None);
        };
        let previous = index
            .checked_sub(1)
            .and_then(|i| self.collections.get(i))
            .map(|c| c.name.as_str());
        let next = self.collections.get(index + 1).map(|c| c.name.as_str());
        (previous, next)
    }
}

#[cfg(test)]
pub(crate) fn sample_records(count: usize) -> Vec<ImageRecord> {
    (0..count)
        .map(|id| ImageRecord {
            id,
            source_url: format!("https://cdn.example.com/full/{id}.jpg"),
            display_url: format!("https://cdn.example.com/web/{id}.jpg"),
            alt_text: format!("Photo {id}"),
            width: None,
            height: None,
        })
        .collect()
}
