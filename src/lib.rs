//! Ringloop is a headless circular carousel engine.
//!
//! It owns a logical sequence of N items, presents them on a visually
//! circular track by padding both ends with clone slots, and converts
//! navigation intents (prev/next/goto/swipe/key) into one authoritative
//! display index plus change notifications.
//!
//! # Pipeline overview
//!
//! 1. **Ring math**: [`RingSpace`] maps logical indices `[0, N)` to the
//!    padded display sequence `[0, N + 2C)` and plans shortest-path routes.
//! 2. **Transitions**: [`transition::TransitionController`] runs the
//!    Idle/Transitioning state machine with deferred settle and inter-step
//!    deadlines.
//! 3. **Façade**: [`CarouselEngine`] wires geometry, ring and transitions and
//!    exposes the public contract (coarse settle channel, fine frame channel).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Headless**: no UI objects; the embedder supplies geometry via
//!   [`Measure`] and renders from emitted offsets.
//! - **Deterministic-by-default**: the embedder drives time through
//!   `advance_to(now_ms)`; every deferred action fires in a fixed order and
//!   superseded work is cancelled by generation, never fired late.
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod ring;
pub mod timer;
pub mod transition;
pub mod visibility;

pub use config::EngineConfig;
pub use engine::{CarouselEngine, FrameEvent, SettleEvent, Slot};
pub use error::{RingloopError, RingloopResult};
pub use geometry::{FixedMeasure, Geometry, Measure, Metrics};
pub use input::{Key, NavIntent, SwipeTracker, key_intent, swipe_intent};
pub use ring::{Direction, PathPlan, RingSpace};
pub use visibility::{PlaybackCommand, VisibilityGate};
