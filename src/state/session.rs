/// Gallery session
///
/// One `GallerySession` owns every piece of per-session state: the loaded
/// collections, the active tab, visibility windows, prefetch bookkeeping,
/// the proximity observer, the lightbox and the current route. It is
/// created when collections arrive and dropped with the application.
use super::columns;
use super::data::{Collection, Collections, ImageRecord};
use super::lightbox::{Lightbox, Step};
use super::prefetch::{PrefetchRequest, PrefetchTracker};
use super::proximity::{ProximityObserver, ScrollMetrics};
use super::route::Route;
use super::window::VisibilityWindow;
use crate::config::Settings;

#[derive(Debug, Clone)]
pub struct GallerySession {
    collections: Collections,
    active: Option<String>,
    window: VisibilityWindow,
    prefetch: PrefetchTracker,
    proximity: ProximityObserver,
    lightbox: Lightbox,
    route: Route,
    column_margin: f32,
}

impl GallerySession {
    pub fn new(collections: Collections, settings: &Settings) -> Self {
        Self {
            collections,
            active: None,
            window: VisibilityWindow::new(settings.initial_batch, settings.batch_size),
            prefetch: PrefetchTracker::new(settings.low_res_width, settings.low_res_quality),
            proximity: ProximityObserver::new(settings.proximity_margin),
            lightbox: Lightbox::Closed,
            route: Route::root(),
            column_margin: settings.column_margin,
        }
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Every record of the active tab
    pub fn active_images(&self) -> &[ImageRecord] {
        self.active
            .as_deref()
            .and_then(|name| self.collections.get(name))
            .map(Collection::images)
            .unwrap_or(&[])
    }

    /// The rendered prefix of the active tab
    pub fn visible_images(&self) -> &[ImageRecord] {
        let images = self.active_images();
        &images[..self.visible_count().min(images.len())]
    }

    pub fn visible_count(&self) -> usize {
        self.active.as_deref().map_or(0, |name| self.window.visible(name))
    }

    /// Whether the sentinel (and "Load more") belongs in the render
    pub fn has_sentinel(&self) -> bool {
        match self.active.as_deref() {
            Some(name) => !self.window.is_full(name, self.collections.len_of(name)),
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.proximity.armed().is_some()
    }

    /// Switch to tab `name`. Returns the prefetch requests for its neighbours.
    pub fn activate(&mut self, name: &str) -> Vec<PrefetchRequest> {
        let Some(collection) = self.collections.get(name) else {
            log::warn!("⚠️  Unknown tab: {}", name);
            return Vec::new();
        };
        let len = collection.len();

        if self.active.as_deref() != Some(name) {
            self.lightbox.close();
            self.route = Route::root();
        }

        let visible = self.window.activate(name, len);
        self.active = Some(name.to_string());
        self.proximity.disarm();
        self.rearm();
        log::info!("🗂️  Showing {} ({} of {} photos)", name, visible, len);

        let (previous, next) = self.collections.neighbors(name);
        let neighbors: Vec<String> = previous.into_iter().chain(next).map(str::to_string).collect();
        neighbors
            .iter()
            .flat_map(|neighbor| self.prefetch.prefetch(neighbor, &self.collections, &self.window))
            .collect()
    }

    /// A tab control was hovered or focused
    pub fn hover(&mut self, name: &str) -> Vec<PrefetchRequest> {
        self.prefetch.prefetch(name, &self.collections, &self.window)
    }

    /// Reveal the next batch, but only if the window still ends at `index`.
    /// The proximity signal and "Load more" both go through here, so when
    /// they race for the same sentinel only the first one counts.
    pub fn reveal_after(&mut self, index: usize) -> bool {
        let Some(name) = self.active.clone() else {
            return false;
        };
        let len = self.collections.len_of(&name);
        if self.window.visible(&name) != index || self.window.is_full(&name, len) {
            return false;
        }

        let batch = self.window.batch_size();
        let visible = self.window.reveal(&name, batch, len);
        // the sentinel moved; it is observed again on the next rearm
        self.proximity.disarm();
        log::debug!("📜 {} now shows {} of {}", name, visible, len);
        true
    }

    /// Feed scroll metrics to the observer. Returns true if the window grew.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> bool {
        match self.proximity.observe(metrics) {
            Some(sentinel) if self.active.as_deref() == Some(sentinel.collection.as_str()) => {
                self.reveal_after(sentinel.index)
            }
            _ => false,
        }
    }

    /// Observe the sentinel of the current render, or stop observing if the
    /// active tab is fully revealed
    pub fn rearm(&mut self) {
        match self.active.clone() {
            Some(name) if self.has_sentinel() => {
                let index = self.window.visible(&name);
                self.proximity.arm(&name, index);
            }
            _ => self.proximity.disarm(),
        }
    }

    /// Arm the sentinel of the current render and check it against the last
    /// known metrics right away, the way an observer reports an element that
    /// is already on screen. Returns true if the window grew.
    pub fn rearm_and_check(&mut self, metrics: &ScrollMetrics) -> bool {
        self.rearm();
        self.on_scroll(metrics)
    }

    /// Column assignment of the rendered prefix
    pub fn columns(&self, count: usize) -> Vec<Vec<&ImageRecord>> {
        columns::distribute(self.visible_images(), count, self.column_margin)
    }

    /// Estimated top of a rendered record, in column widths
    pub fn estimated_top(&self, count: usize, id: usize) -> Option<f32> {
        columns::estimated_top(self.visible_images(), count, self.column_margin, id)
    }

    /// URL of the low resolution variant prefetched for `record`
    pub fn low_res_url(&self, record: &ImageRecord) -> Option<String> {
        self.prefetch.low_res(&record.display_url)
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// The record shown in the lightbox
    pub fn current_photo(&self) -> Option<&ImageRecord> {
        self.lightbox
            .position()
            .and_then(|position| self.active_images().get(position))
    }

    /// Follow a navigational reference. Returns the last viewed position
    /// when the reference closes the lightbox.
    pub fn navigate(&mut self, route: Route) -> Option<usize> {
        match route.photo_id {
            Some(position) => {
                self.open_photo(position);
                None
            }
            None => self.close_lightbox(),
        }
    }

    /// Open the lightbox on any record of the active tab, rendered or not
    pub fn open_photo(&mut self, position: usize) -> bool {
        let len = self.active_images().len();
        if !self.lightbox.open(position, len) {
            log::debug!("🔍 Ignoring photo {} (tab has {})", position, len);
            return false;
        }
        self.route = Route::photo(position);
        true
    }

    pub fn step(&mut self, step: Step) -> bool {
        let len = self.active_images().len();
        if !self.lightbox.step(step, len) {
            return false;
        }
        self.route = Route {
            photo_id: self.lightbox.position(),
        };
        true
    }

    /// Close the lightbox. The last viewed record is revealed in the grid so
    /// it can be scrolled into view; its position is returned.
    pub fn close_lightbox(&mut self) -> Option<usize> {
        let last = self.lightbox.close()?;
        self.route = Route::root();

        if let Some(name) = self.active.clone() {
            let len = self.collections.len_of(&name);
            if self.window.visible(&name) <= last {
                self.window.reveal_through(&name, last + 1, len);
                self.rearm();
            }
        }
        Some(last)
    }

    /// Swap in freshly loaded collections. All per-tab state starts over;
    /// the active tab is kept if it still exists.
    pub fn replace_collections(&mut self, collections: Collections) -> Vec<PrefetchRequest> {
        let keep = self
            .active
            .take()
            .filter(|name| collections.get(name).is_some())
            .or_else(|| collections.first_name().map(str::to_string));

        self.collections = collections;
        self.window.reset();
        self.prefetch.reset();
        self.proximity.disarm();
        self.lightbox.close();
        self.route = Route::root();

        match keep {
            Some(name) => self.activate(&name),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::sample_records;
    use crate::state::prefetch::Variant;

    fn session(sizes: &[(&str, usize)]) -> GallerySession {
        let collections = Collections::new(
            sizes
                .iter()
                .map(|(name, count)| Collection::new(*name, sample_records(*count)))
                .collect(),
        )
        .unwrap();
        GallerySession::new(collections, &Settings::default())
    }

    fn near_bottom() -> ScrollMetrics {
        ScrollMetrics {
            offset_y: 1000.0,
            viewport_height: 800.0,
            content_height: 1820.0,
        }
    }

    #[test]
    fn test_infinite_scroll_end_to_end() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");
        assert_eq!(session.visible_count(), 12);
        assert!(session.has_sentinel());

        assert!(session.on_scroll(&near_bottom()));
        session.rearm();
        assert_eq!(session.visible_count(), 24);

        for _ in 0..2 {
            session.on_scroll(&near_bottom());
            session.rearm();
        }
        assert_eq!(session.visible_count(), 30);
        assert!(!session.has_sentinel());
        assert!(!session.is_armed());
        assert_eq!(session.visible_images().len(), 30);
    }

    #[test]
    fn test_signal_ignored_until_rearmed() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");

        assert!(session.on_scroll(&near_bottom()));
        assert!(!session.on_scroll(&near_bottom()));
        assert_eq!(session.visible_count(), 24);
    }

    #[test]
    fn test_load_more_races_with_signal() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");

        // both triggers saw the sentinel after 12 records
        assert!(session.on_scroll(&near_bottom()));
        assert!(!session.reveal_after(12));
        assert_eq!(session.visible_count(), 24);

        assert!(session.reveal_after(24));
        assert!(!session.reveal_after(30));
        assert_eq!(session.visible_count(), 30);
    }

    #[test]
    fn test_short_content_grows_without_scrolling() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");

        // the first batch fits in a tall window, nothing can scroll
        let short = ScrollMetrics {
            offset_y: 0.0,
            viewport_height: 1440.0,
            content_height: 900.0,
        };
        assert!(session.rearm_and_check(&short));
        assert_eq!(session.visible_count(), 24);

        assert!(session.rearm_and_check(&short));
        assert_eq!(session.visible_count(), 30);
        assert!(!session.rearm_and_check(&short));
        assert!(!session.is_armed());
    }

    #[test]
    fn test_rearm_check_waits_for_the_viewport() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");

        let far = ScrollMetrics {
            offset_y: 0.0,
            viewport_height: 800.0,
            content_height: 4000.0,
        };
        assert!(!session.rearm_and_check(&far));
        assert!(!session.rearm_and_check(&ScrollMetrics::default()));
        assert_eq!(session.visible_count(), 12);
        assert!(session.is_armed());
    }

    #[test]
    fn test_tab_switch_preserves_window() {
        let mut session = session(&[("Day 1", 30), ("Day 2", 30)]);
        session.activate("Day 1");
        session.reveal_after(12);

        session.activate("Day 2");
        assert_eq!(session.visible_count(), 12);

        session.activate("Day 1");
        assert_eq!(session.visible_count(), 24);
        assert!(session.is_armed());
    }

    #[test]
    fn test_activation_prefetches_neighbors_once() {
        let mut session = session(&[("Opening Party", 20), ("Day 1", 20), ("Day 2", 20), ("Afterparty", 20)]);

        let first = session.activate("Day 1");
        let tabs: Vec<&str> = first
            .iter()
            .filter(|r| r.variant == Variant::Display)
            .map(|r| r.collection.as_str())
            .collect();
        assert_eq!(tabs.iter().filter(|t| **t == "Opening Party").count(), 12);
        assert_eq!(tabs.iter().filter(|t| **t == "Day 2").count(), 12);

        // Day 2 was already prefetched as a neighbour of Day 1
        let again = session.activate("Day 2");
        assert!(again.iter().all(|r| r.collection == "Day 1" || r.collection == "Afterparty"));
        assert!(again.iter().any(|r| r.collection == "Afterparty"));

        assert!(session.hover("Day 2").is_empty());
    }

    #[test]
    fn test_lightbox_end_to_end() {
        let mut session = session(&[("Day 1", 10)]);
        session.activate("Day 1");

        assert!(session.open_photo(5));
        for _ in 0..3 {
            session.step(Step::Next);
        }
        assert_eq!(session.lightbox().position(), Some(8));
        assert_eq!(session.route(), Route::photo(8));

        session.step(Step::Next);
        assert_eq!(session.lightbox().position(), Some(9));
        session.step(Step::Next);
        assert_eq!(session.lightbox().position(), Some(9));
    }

    #[test]
    fn test_lightbox_reaches_unrevealed_records() {
        let mut session = session(&[("Day 1", 30)]);
        session.activate("Day 1");

        assert!(session.navigate(Route::photo(20)).is_none());
        assert_eq!(session.current_photo().map(|r| r.id), Some(20));
        assert_eq!(session.visible_count(), 12);

        assert!(!session.open_photo(30));
        assert_eq!(session.lightbox().position(), Some(20));

        assert_eq!(session.navigate(Route::root()), Some(20));
        assert!(!session.lightbox().is_open());
        assert_eq!(session.visible_count(), 21);
        assert!(session.estimated_top(3, 20).is_some());
        assert!(session.is_armed());
    }

    #[test]
    fn test_tab_switch_closes_lightbox() {
        let mut session = session(&[("Day 1", 10), ("Day 2", 10)]);
        session.activate("Day 1");
        session.open_photo(3);

        session.activate("Day 2");
        assert!(!session.lightbox().is_open());
        assert_eq!(session.route(), Route::root());
    }

    #[test]
    fn test_unknown_tab_is_ignored() {
        let mut session = session(&[("Day 1", 10)]);
        session.activate("Day 1");
        assert!(session.activate("Day 9").is_empty());
        assert_eq!(session.active(), Some("Day 1"));
    }

    #[test]
    fn test_replace_collections_resets_state() {
        let mut session = session(&[("Day 1", 30), ("Day 2", 30)]);
        session.activate("Day 2");
        session.reveal_after(12);
        session.open_photo(4);

        let fresh = Collections::new(vec![
            Collection::new("Day 1", sample_records(30)),
            Collection::new("Day 2", sample_records(40)),
        ])
        .unwrap();
        let requests = session.replace_collections(fresh);

        assert_eq!(session.active(), Some("Day 2"));
        assert_eq!(session.visible_count(), 12);
        assert!(!session.lightbox().is_open());
        assert!(requests.iter().all(|r| r.collection == "Day 1"));
        assert!(!requests.is_empty());
    }
}
