/// Visibility window: how many records of each tab are rendered
///
/// The rendered subset of a collection is always a prefix. Counts only
/// grow while a session lives and survive switching tabs back and forth.
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct VisibilityWindow {
    counts: HashMap<String, usize>,
    initial_batch: usize,
    batch_size: usize,
}

impl VisibilityWindow {
    pub fn new(initial_batch: usize, batch_size: usize) -> Self {
        Self {
            counts: HashMap::new(),
            initial_batch: initial_batch.max(1),
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Initialise a tab on first activation. Existing counts are left alone.
    pub fn activate(&mut self, name: &str, len: usize) -> usize {
        let initial = self.initial_batch.min(len);
        *self.counts.entry(name.to_string()).or_insert(initial)
    }

    /// Grow the window by `delta`, clamped to `len`
    pub fn reveal(&mut self, name: &str, delta: usize, len: usize) -> usize {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(delta).min(len).max(*count);
        *count
    }

    /// Grow the window until it includes `through` records
    pub fn reveal_through(&mut self, name: &str, through: usize, len: usize) -> usize {
        let current = self.visible(name);
        self.reveal(name, through.saturating_sub(current), len)
    }

    /// Number of revealed records, 0 for tabs never activated
    pub fn visible(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Revealed count, or the initial batch for tabs not yet activated
    pub fn visible_or_initial(&self, name: &str, len: usize) -> usize {
        self.counts
            .get(name)
            .copied()
            .unwrap_or_else(|| self.initial_batch.min(len))
    }

    pub fn is_full(&self, name: &str, len: usize) -> bool {
        self.visible(name) >= len
    }

    /// Forget every tab (used when the collections are reloaded)
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
