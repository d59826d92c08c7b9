use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{RingloopError, RingloopResult};
use crate::geometry::{Geometry, Measure, Metrics};
use crate::input::{Key, NavIntent, key_intent, swipe_intent};
use crate::ring::{Direction, RingSpace};
use crate::transition::{EventBuf, TransitionController, TransitionEvent};

/// One position of the display sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub logical_index: usize,
    /// Shadow copy padding one end of the track.
    pub is_clone: bool,
}

/// Coarse notification: one per settled navigation request.
#[derive(Debug)]
pub struct SettleEvent<'a, T> {
    pub logical_index: usize,
    pub display_index: usize,
    pub item: &'a T,
}

/// Fine notification: every display-index change, animated or not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    pub display_index: usize,
    pub offset_px: f64,
    /// False for shadow corrections and layout repositions; the renderer
    /// must apply those without animation.
    pub animate: bool,
}

type SettleFn<T> = Box<dyn FnMut(SettleEvent<'_, T>)>;
type FrameFn = Box<dyn FnMut(FrameEvent)>;

/// Circular carousel engine façade.
///
/// Owns the items, the padded display sequence, the transition state machine
/// and the geometry cache. The embedder translates raw input into
/// `next`/`prev`/`goto` calls, drives deferred work through
/// [`CarouselEngine::advance_to`], and renders from the fine channel.
pub struct CarouselEngine<T> {
    items: Vec<T>,
    slots: Vec<Slot>,
    ring: RingSpace,
    ctrl: TransitionController,
    geometry: Geometry,
    measure: Box<dyn Measure>,
    cfg: EngineConfig,
    settle_listeners: Vec<SettleFn<T>>,
    frame_listeners: Vec<FrameFn>,
    disposed: bool,
}

impl<T> CarouselEngine<T> {
    /// Build an engine over `items`. Fails on an empty item list or an
    /// invalid config; geometry is pulled once, non-animated.
    pub fn new(
        items: Vec<T>,
        mut measure: Box<dyn Measure>,
        cfg: EngineConfig,
    ) -> RingloopResult<Self> {
        cfg.validate()?;
        if items.is_empty() {
            return Err(RingloopError::configuration(
                "carousel requires at least one item",
            ));
        }

        let ring = RingSpace::new(items.len(), cfg.clone_buffer)?;
        let slots = (0..ring.display_len())
            .map(|d| Slot {
                logical_index: ring.to_logical(d),
                is_clone: ring.is_shadow(d),
            })
            .collect();

        let mut geometry = Geometry::new(cfg.resize_debounce_ms);
        geometry.prime(measure.as_mut());

        debug!(
            items = items.len(),
            clone_buffer = cfg.clone_buffer,
            "CarouselEngine::new"
        );

        Ok(Self {
            items,
            slots,
            ring,
            ctrl: TransitionController::new(ring, cfg.settle_duration_ms, cfg.inter_step_delay_ms),
            geometry,
            measure,
            cfg,
            settle_listeners: Vec::new(),
            frame_listeners: Vec::new(),
            disposed: false,
        })
    }

    // ---- reads -----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        false // construction requires at least one item
    }

    pub fn current_logical_index(&self) -> usize {
        self.ctrl.logical_index()
    }

    pub fn display_index(&self) -> usize {
        self.ctrl.display_index()
    }

    pub fn in_transition(&self) -> bool {
        self.ctrl.in_transition()
    }

    /// Current transform offset in px (zero while layout is not ready).
    pub fn offset_px(&self) -> f64 {
        self.geometry.offset_px(self.ctrl.display_index())
    }

    pub fn metrics(&self) -> Metrics {
        self.geometry.metrics()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn item(&self, logical_index: usize) -> Option<&T> {
        self.items.get(logical_index)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    // ---- listeners -------------------------------------------------------

    /// Coarse channel: fires once per settled request (background-media swap,
    /// indicator highlight).
    pub fn on_settle(&mut self, cb: impl FnMut(SettleEvent<'_, T>) + 'static) {
        if self.disposed {
            return;
        }
        self.settle_listeners.push(Box::new(cb));
    }

    /// Fine channel: fires on every display-index change (drag-following UI).
    pub fn on_frame(&mut self, cb: impl FnMut(FrameEvent) + 'static) {
        if self.disposed {
            return;
        }
        self.frame_listeners.push(Box::new(cb));
    }

    // ---- navigation ------------------------------------------------------

    pub fn next(&mut self, now: u64) -> RingloopResult<bool> {
        self.step(now, Direction::Forward)
    }

    pub fn prev(&mut self, now: u64) -> RingloopResult<bool> {
        self.step(now, Direction::Backward)
    }

    pub fn step(&mut self, now: u64, direction: Direction) -> RingloopResult<bool> {
        if self.disposed {
            return Ok(false);
        }
        let mut buf = EventBuf::new();
        let accepted = self.ctrl.step(now, direction, &mut buf);
        self.dispatch(&buf);
        Ok(accepted)
    }

    /// Navigate to a logical index along the shortest ring path.
    pub fn goto(&mut self, now: u64, logical_index: usize) -> RingloopResult<bool> {
        if self.disposed {
            return Ok(false);
        }
        let mut buf = EventBuf::new();
        let accepted = self.ctrl.goto_logical(now, logical_index, &mut buf)?;
        self.dispatch(&buf);
        Ok(accepted)
    }

    pub fn apply_intent(&mut self, now: u64, intent: NavIntent) -> RingloopResult<bool> {
        match intent {
            NavIntent::Next => self.next(now),
            NavIntent::Prev => self.prev(now),
        }
    }

    /// Finished pointer drag: navigate if the delta crosses the configured
    /// swipe threshold.
    pub fn end_swipe(&mut self, now: u64, delta_px: f64) -> RingloopResult<bool> {
        match swipe_intent(delta_px, self.cfg.swipe_threshold_px) {
            Some(intent) => self.apply_intent(now, intent),
            None => Ok(false),
        }
    }

    pub fn press_key(&mut self, now: u64, key: Key) -> RingloopResult<bool> {
        match key_intent(key) {
            Some(intent) => self.apply_intent(now, intent),
            None => Ok(false),
        }
    }

    // ---- clock -----------------------------------------------------------

    /// Record a resize/layout signal (debounced, trailing edge).
    pub fn signal_layout_changed(&mut self, now: u64) {
        if self.disposed {
            return;
        }
        self.geometry.invalidate(now);
    }

    /// Fire all deferred work due at `now`. The embedder calls this from its
    /// timer wired to [`CarouselEngine::next_deadline`].
    pub fn advance_to(&mut self, now: u64) {
        if self.disposed {
            return;
        }

        let mut buf = EventBuf::new();
        self.ctrl.fire_due(now, &mut buf);
        self.dispatch(&buf);

        if self.geometry.poll(now, self.measure.as_mut()) {
            // Fresh metrics move every offset; reposition without animation.
            let ev = FrameEvent {
                display_index: self.ctrl.display_index(),
                offset_px: self.offset_px(),
                animate: false,
            };
            let mut frame = std::mem::take(&mut self.frame_listeners);
            for f in &mut frame {
                f(ev);
            }
            self.frame_listeners = frame;
        }
    }

    /// Earliest pending deadline across transitions and geometry, if any.
    pub fn next_deadline(&mut self) -> Option<u64> {
        match (self.ctrl.next_deadline(), self.geometry.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel all pending work and detach listeners; the engine becomes
    /// inert and every further call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!("CarouselEngine::dispose");
        self.ctrl.cancel();
        self.geometry.reset();
        self.settle_listeners.clear();
        self.frame_listeners.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispatch(&mut self, events: &EventBuf) {
        if events.is_empty() {
            return;
        }
        // Listeners cannot re-enter the engine (it is exclusively borrowed),
        // so taking the vectors out for the duration of the calls is safe.
        let mut settle = std::mem::take(&mut self.settle_listeners);
        let mut frame = std::mem::take(&mut self.frame_listeners);

        for ev in events {
            match *ev {
                TransitionEvent::Frame { display_index } => {
                    let e = FrameEvent {
                        display_index,
                        offset_px: self.geometry.offset_px(display_index),
                        animate: true,
                    };
                    for f in &mut frame {
                        f(e);
                    }
                }
                TransitionEvent::Snapped { display_index } => {
                    let e = FrameEvent {
                        display_index,
                        offset_px: self.geometry.offset_px(display_index),
                        animate: false,
                    };
                    for f in &mut frame {
                        f(e);
                    }
                }
                TransitionEvent::Settled { display_index } => {
                    let logical_index = self.ring.to_logical(display_index);
                    for f in &mut settle {
                        f(SettleEvent {
                            logical_index,
                            display_index,
                            item: &self.items[logical_index],
                        });
                    }
                }
            }
        }

        self.settle_listeners = settle;
        self.frame_listeners = frame;
    }
}
