/// Track geometry as reported by the embedder.
///
/// A zero `item_extent` means the surface is not laid out yet; offsets
/// degrade to zero and nothing errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Metrics {
    pub item_extent: f64,
    pub gap: f64,
}

/// Supplied by the embedder; called lazily at init and after each debounced
/// layout-changed signal.
pub trait Measure {
    fn measure(&mut self) -> Metrics;
}

/// Fixed geometry, for tests and scripted runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedMeasure(pub Metrics);

impl Measure for FixedMeasure {
    fn measure(&mut self) -> Metrics {
        self.0
    }
}

/// Cached metrics with trailing-edge debounce of layout-changed signals.
///
/// A burst of `invalidate` calls inside the debounce window collapses to a
/// single re-measure once the window goes quiet.
#[derive(Debug)]
pub struct Geometry {
    metrics: Metrics,
    debounce_ms: u64,
    deadline: Option<u64>,
}

impl Geometry {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            metrics: Metrics::default(),
            debounce_ms,
            deadline: None,
        }
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Transform offset for a display position, in px.
    pub fn offset_px(&self, display_index: usize) -> f64 {
        display_index as f64 * (self.metrics.item_extent + self.metrics.gap)
    }

    /// Initial pull; not debounced.
    pub fn prime(&mut self, measure: &mut dyn Measure) {
        self.metrics = measure.measure();
        self.deadline = None;
    }

    /// Record a layout-changed signal; restarts the debounce window.
    pub fn invalidate(&mut self, now: u64) {
        self.deadline = Some(now + self.debounce_ms);
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Re-measure if the debounce window has elapsed. Returns true when the
    /// cached metrics actually changed.
    pub fn poll(&mut self, now: u64, measure: &mut dyn Measure) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                let fresh = measure.measure();
                if fresh != self.metrics {
                    self.metrics = fresh;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.deadline = None;
    }
}
