//! Half-open time windows.
//!
//! All overlap and containment decisions in the crate go through this type so
//! boundary handling stays identical for events and sessions.

use super::EpochMs;
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: EpochMs,
    pub end: EpochMs,
}

impl TimeWindow {
    pub fn new(start: EpochMs, end: EpochMs) -> Self {
        Self { start, end }
    }

    /// Returns whether `end > start`.
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Strict half-open overlap: windows that only touch do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns whether `other` lies entirely inside this window.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}
