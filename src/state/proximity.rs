/// Proximity signal for the grid sentinel
///
/// The sentinel sits after the last rendered record. The observer is armed
/// for one sentinel at a time and fires at most once per arming: after the
/// window grows the sentinel is a new element and must be armed again.

/// Scroll metrics reported by the grid's scrollable, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub offset_y: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of the content
    pub fn remaining(&self) -> f32 {
        (self.content_height - self.offset_y - self.viewport_height).max(0.0)
    }

    /// Whether the grid has reported a layout yet
    pub fn is_measured(&self) -> bool {
        self.viewport_height > 0.0
    }
}

/// The element being observed: the sentinel placed after `index` records of `collection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    pub collection: String,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct ProximityObserver {
    armed: Option<Sentinel>,
    margin: f32,
}

impl ProximityObserver {
    pub fn new(margin: f32) -> Self {
        Self {
            armed: None,
            margin: margin.max(0.0),
        }
    }

    /// Observe a freshly rendered sentinel, replacing any previous one
    pub fn arm(&mut self, collection: &str, index: usize) {
        self.armed = Some(Sentinel {
            collection: collection.to_string(),
            index,
        });
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<&Sentinel> {
        self.armed.as_ref()
    }

    /// Fire if the armed sentinel is within the margin of the viewport.
    /// Content shorter than the viewport leaves the sentinel on screen, so it
    /// fires too. Metrics from a grid that was never laid out are ignored.
    /// Firing disarms the observer.
    pub fn observe(&mut self, metrics: &ScrollMetrics) -> Option<Sentinel> {
        if !metrics.is_measured() {
            return None;
        }
        if self.armed.is_some() && metrics.remaining() <= self.margin {
            self.armed.take()
        } else {
            None
        }
    }
}
