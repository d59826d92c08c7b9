/// Direction-only navigation intent produced by input translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavIntent {
    Next,
    Prev,
}

/// Keys the embedder forwards to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
}

pub fn key_intent(key: Key) -> Option<NavIntent> {
    match key {
        Key::ArrowRight => Some(NavIntent::Next),
        Key::ArrowLeft => Some(NavIntent::Prev),
    }
}

/// Accumulates one pointer drag and turns it into a swipe intent.
///
/// Dragging left (negative delta) reveals the next item. Releases below the
/// threshold produce no intent.
#[derive(Clone, Copy, Debug)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    pub fn is_active(&self) -> bool {
        self.start_x.is_some()
    }

    /// Current drag delta for drag-following UI, if a drag is active.
    pub fn delta(&self, x: f64) -> Option<f64> {
        self.start_x.map(|s| x - s)
    }

    pub fn end(&mut self, x: f64) -> Option<NavIntent> {
        let start = self.start_x.take()?;
        swipe_intent(x - start, self.threshold_px)
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}

pub fn swipe_intent(delta_px: f64, threshold_px: f64) -> Option<NavIntent> {
    if delta_px <= -threshold_px {
        Some(NavIntent::Next)
    } else if delta_px >= threshold_px {
        Some(NavIntent::Prev)
    } else {
        None
    }
}
