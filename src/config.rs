use crate::error::{RingloopError, RingloopResult};

/// Engine tuning knobs. All durations are in milliseconds on the embedder's
/// monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clone slots per side of the display sequence. Must be >= 1.
    pub clone_buffer: usize,
    /// Time from the last index mutation of a request to its visual settle.
    pub settle_duration_ms: u64,
    /// Delay between consecutive mutations of a multi-step run.
    pub inter_step_delay_ms: u64,
    /// Minimum horizontal drag distance that counts as a swipe.
    pub swipe_threshold_px: f64,
    /// Trailing-edge debounce window for layout-changed signals.
    pub resize_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clone_buffer: 1,
            settle_duration_ms: 600,
            inter_step_delay_ms: 120,
            swipe_threshold_px: 50.0,
            resize_debounce_ms: 200,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> RingloopResult<()> {
        if self.clone_buffer == 0 {
            return Err(RingloopError::configuration("clone_buffer must be >= 1"));
        }
        if self.settle_duration_ms == 0 {
            return Err(RingloopError::configuration(
                "settle_duration_ms must be > 0",
            ));
        }
        if self.inter_step_delay_ms == 0 {
            return Err(RingloopError::configuration(
                "inter_step_delay_ms must be > 0",
            ));
        }
        if !self.swipe_threshold_px.is_finite() || self.swipe_threshold_px <= 0.0 {
            return Err(RingloopError::configuration(
                "swipe_threshold_px must be finite and > 0",
            ));
        }
        if self.resize_debounce_ms == 0 {
            return Err(RingloopError::configuration(
                "resize_debounce_ms must be > 0",
            ));
        }
        Ok(())
    }
}
