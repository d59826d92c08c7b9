use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{RingloopError, RingloopResult};
use crate::ring::{Direction, RingSpace};
use crate::timer::TimerQueue;

/// Per-call event buffer; a single request rarely emits more than a few.
pub type EventBuf = SmallVec<[TransitionEvent; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// Raw controller output. The engine façade maps display indices to logical
/// indices and items before notifying listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Animated display-index mutation (fine channel).
    Frame { display_index: usize },
    /// Silent reposition preserving the logical index; render without
    /// animation (fine channel).
    Snapped { display_index: usize },
    /// Settle point of the current request: active-item swap (coarse channel).
    Settled { display_index: usize },
}

#[derive(Clone, Copy, Debug)]
enum TimerAction {
    /// Next mutation of an in-flight multi-step run.
    Step,
    /// Half-settle content swap point.
    UiSync,
    /// Full settle: shadow correction, back to Idle.
    Settle,
}

#[derive(Clone, Copy, Debug)]
struct Run {
    direction: Direction,
    /// Step timer firings still pending (the first mutation of a run is
    /// applied synchronously with the request).
    remaining: usize,
    multi: bool,
}

/// Owns the carousel state `{display_index, phase}` and turns navigation
/// requests into timed mutation sequences.
///
/// Invariant: `display_index ∈ [0, N + 2C)` at all times. A mutation from a
/// shadow position first snaps back into the real region, so one step never
/// leaves the display range.
pub struct TransitionController {
    ring: RingSpace,
    display_index: usize,
    phase: Phase,
    run: Option<Run>,
    timers: TimerQueue<TimerAction>,
    settle_duration_ms: u64,
    inter_step_delay_ms: u64,
}

impl TransitionController {
    pub fn new(ring: RingSpace, settle_duration_ms: u64, inter_step_delay_ms: u64) -> Self {
        Self {
            ring,
            display_index: ring.to_display(0),
            phase: Phase::Idle,
            run: None,
            timers: TimerQueue::new(),
            settle_duration_ms,
            inter_step_delay_ms,
        }
    }

    pub fn display_index(&self) -> usize {
        self.display_index
    }

    pub fn logical_index(&self) -> usize {
        self.ring.to_logical(self.display_index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_transition(&self) -> bool {
        self.phase == Phase::Transitioning
    }

    pub fn next_deadline(&mut self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Single-step request. Rejected (no-op) while a transition is in flight.
    pub fn step(&mut self, now: u64, direction: Direction, out: &mut EventBuf) -> bool {
        if self.in_transition() {
            trace!(?direction, "step rejected: transition in flight");
            return false;
        }
        self.begin_single(now, direction, out);
        true
    }

    /// Smart navigation to a logical index.
    ///
    /// Distance 0 is a no-op. A target one position away (by raw display
    /// distance or logical shortest path) takes the single-step path;
    /// anything further runs a multi-step sequence at the inter-step delay.
    /// A multi-step run already in flight is superseded by a new `goto`;
    /// any other in-flight transition rejects the request.
    pub fn goto_logical(
        &mut self,
        now: u64,
        target: usize,
        out: &mut EventBuf,
    ) -> RingloopResult<bool> {
        if target >= self.ring.len() {
            return Err(RingloopError::navigation(format!(
                "goto target {target} out of range 0..{}",
                self.ring.len()
            )));
        }

        let superseding = match (self.phase, self.run) {
            (Phase::Idle, _) => false,
            (Phase::Transitioning, Some(run)) if run.multi => {
                debug!(target, "superseding in-flight multi-step run");
                self.timers.cancel_pending();
                self.run = None;
                true
            }
            (Phase::Transitioning, _) => {
                trace!(target, "goto rejected: single-step transition in flight");
                return Ok(false);
            }
        };

        let current = self.logical_index();
        let plan = self.ring.shortest_path(current, target);

        if plan.steps == 0 {
            if superseding {
                // Already on target mid-flight; the new request still owns
                // the settle sequence the old one no longer runs.
                self.run = Some(Run {
                    direction: plan.direction,
                    remaining: 0,
                    multi: false,
                });
                self.schedule_settle(now);
                return Ok(true);
            }
            return Ok(false);
        }

        // Neighboring display position is always a single step, regardless
        // of how the request came in.
        let target_display = self.ring.to_display(target);
        let adjacent = self.display_index.abs_diff(target_display) == 1;
        if plan.steps == 1 || adjacent {
            let direction = if adjacent {
                if target_display > self.display_index {
                    Direction::Forward
                } else {
                    Direction::Backward
                }
            } else {
                plan.direction
            };
            self.begin_single(now, direction, out);
            return Ok(true);
        }

        self.phase = Phase::Transitioning;
        self.run = Some(Run {
            direction: plan.direction,
            remaining: plan.steps - 1,
            multi: true,
        });
        self.apply_mutation(plan.direction, out);
        self.timers
            .schedule(now + self.inter_step_delay_ms, TimerAction::Step);
        Ok(true)
    }

    /// Fire every deferred action due at `now`, in deterministic order.
    pub fn fire_due(&mut self, now: u64, out: &mut EventBuf) {
        while let Some(action) = self.timers.pop_due(now) {
            match action {
                TimerAction::Step => {
                    let Some(run) = self.run.as_mut() else {
                        continue;
                    };
                    let direction = run.direction;
                    run.remaining = run.remaining.saturating_sub(1);
                    let last = run.remaining == 0;
                    if last {
                        // Past its last mutation the run settles like a
                        // single step and stops being supersedable; its
                        // settle notification may already be in flight.
                        run.multi = false;
                    }
                    self.apply_mutation(direction, out);
                    if last {
                        self.schedule_settle(now);
                    } else {
                        self.timers
                            .schedule(now + self.inter_step_delay_ms, TimerAction::Step);
                    }
                }
                TimerAction::UiSync => {
                    out.push(TransitionEvent::Settled {
                        display_index: self.display_index,
                    });
                }
                TimerAction::Settle => {
                    let wrapped = self.ring.wrap_if_needed(self.display_index);
                    if wrapped != self.display_index {
                        trace!(
                            from = self.display_index,
                            to = wrapped,
                            "shadow correction at settle"
                        );
                        self.display_index = wrapped;
                        out.push(TransitionEvent::Snapped {
                            display_index: wrapped,
                        });
                    }
                    self.phase = Phase::Idle;
                    self.run = None;
                }
            }
        }
    }

    /// Drop all pending deferred actions and return to Idle. Used by dispose.
    pub fn cancel(&mut self) {
        self.timers.clear();
        self.run = None;
        self.phase = Phase::Idle;
    }

    fn begin_single(&mut self, now: u64, direction: Direction, out: &mut EventBuf) {
        self.phase = Phase::Transitioning;
        self.run = Some(Run {
            direction,
            remaining: 0,
            multi: false,
        });
        self.apply_mutation(direction, out);
        self.schedule_settle(now);
    }

    /// Mutate the display index by one step. A shadow position snaps back
    /// into the real region first, so the index stays in `[0, N + 2C)`.
    fn apply_mutation(&mut self, direction: Direction, out: &mut EventBuf) {
        let wrapped = self.ring.wrap_if_needed(self.display_index);
        if wrapped != self.display_index {
            self.display_index = wrapped;
            out.push(TransitionEvent::Snapped {
                display_index: wrapped,
            });
        }
        self.display_index = (self.display_index as i64 + direction.delta()) as usize;
        debug_assert!(self.display_index < self.ring.display_len());
        out.push(TransitionEvent::Frame {
            display_index: self.display_index,
        });
    }

    fn schedule_settle(&mut self, now: u64) {
        self.timers
            .schedule(now + self.settle_duration_ms / 2, TimerAction::UiSync);
        self.timers
            .schedule(now + self.settle_duration_ms, TimerAction::Settle);
    }
}
