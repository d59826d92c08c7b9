use crate::error::{RingloopError, RingloopResult};

/// Navigation direction over the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Result of a shortest-path query: how many single steps, which way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathPlan {
    pub direction: Direction,
    pub steps: usize,
}

/// Pure mapping between the logical ring `[0, N)` and the padded display
/// sequence `[0, N + 2C)`.
///
/// Positions `[0, C)` and `[N+C, N+2C)` are shadow (clone) slots mirroring
/// the tail and head of the logical sequence; `[C, N+C)` are the real items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingSpace {
    len: usize,
    clones: usize,
}

impl RingSpace {
    pub fn new(len: usize, clones: usize) -> RingloopResult<Self> {
        if len == 0 {
            return Err(RingloopError::configuration("ring len must be >= 1"));
        }
        if clones == 0 {
            return Err(RingloopError::configuration("clone buffer must be >= 1"));
        }
        Ok(Self { len, clones })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false // len >= 1 by construction
    }

    pub fn clones(&self) -> usize {
        self.clones
    }

    /// Total length of the display sequence including both clone buffers.
    pub fn display_len(&self) -> usize {
        self.len + 2 * self.clones
    }

    pub fn to_display(&self, logical: usize) -> usize {
        debug_assert!(logical < self.len);
        logical + self.clones
    }

    pub fn to_logical(&self, display: usize) -> usize {
        let n = self.len as i64;
        (display as i64 - self.clones as i64).rem_euclid(n) as usize
    }

    /// True iff `display` lies in one of the clone buffers.
    pub fn is_shadow(&self, display: usize) -> bool {
        display < self.clones || display >= self.len + self.clones
    }

    /// Snap a shadow position back into the real region, preserving the
    /// logical index. Real positions pass through unchanged.
    ///
    /// A clone buffer deeper than the ring needs more than one ±N shift, so
    /// this normalizes through the logical index instead.
    pub fn wrap_if_needed(&self, display: usize) -> usize {
        if self.is_shadow(display) {
            self.to_display(self.to_logical(display))
        } else {
            display
        }
    }

    /// Shortest route between two logical indices over the ring.
    ///
    /// Ties (only possible for even N at the exact half) break forward.
    pub fn shortest_path(&self, from: usize, to: usize) -> PathPlan {
        debug_assert!(from < self.len && to < self.len);
        let n = self.len as i64;
        let d = (to as i64 - from as i64).rem_euclid(n);
        if d <= n - d {
            PathPlan {
                direction: Direction::Forward,
                steps: d as usize,
            }
        } else {
            PathPlan {
                direction: Direction::Backward,
                steps: (n - d) as usize,
            }
        }
    }
}
